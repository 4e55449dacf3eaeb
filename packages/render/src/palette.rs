//! Colour palettes per geography and dataset.
//!
//! LSOA maps use fixed ten-step palettes so each decile keeps its colour
//! whatever the domain. LAD maps use continuous sequential palettes,
//! darkest at rank 1.

use depriv_map_index_models::{Dataset, Geography};
use depriv_map_render_models::ColorStop;

/// A named list of colours, spread evenly from 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Palette name, for logs.
    pub name: &'static str,
    /// Colours from the low end of the range to the high end.
    pub colors: &'static [&'static str],
}

/// PPFI deciles, dark blue (most vulnerable) to white.
pub const PPFI_LSOA: Palette = Palette {
    name: "ppfi_deciles",
    colors: &[
        "#00214d", "#003366", "#004c8c", "#0066a1", "#3386b2", "#66a6c4", "#99c6d7", "#cce6e9",
        "#e6f1f4", "#ffffff",
    ],
};

/// IMD deciles, dark green (most deprived) to white.
pub const IMD_LSOA: Palette = Palette {
    name: "imd_deciles",
    colors: &[
        "#002d12", "#00441b", "#006d2c", "#238b45", "#41ab5d", "#74c476", "#a1d99b", "#c7e9c0",
        "#edf8e9", "#ffffff",
    ],
};

/// Reversed sequential blues for PPFI ranks.
pub const PPFI_LAD: Palette = Palette {
    name: "Blues_r",
    colors: &[
        "rgb(8,48,107)",
        "rgb(8,81,156)",
        "rgb(33,113,181)",
        "rgb(66,146,198)",
        "rgb(107,174,214)",
        "rgb(158,202,225)",
        "rgb(198,219,239)",
        "rgb(222,235,247)",
        "rgb(247,251,255)",
    ],
};

/// Reversed sequential greens for IMD ranks.
pub const IMD_LAD: Palette = Palette {
    name: "Greens_r",
    colors: &[
        "rgb(0,68,27)",
        "rgb(0,109,44)",
        "rgb(35,139,69)",
        "rgb(65,171,93)",
        "rgb(116,196,118)",
        "rgb(161,217,155)",
        "rgb(199,233,192)",
        "rgb(229,245,224)",
        "rgb(247,252,245)",
    ],
};

impl Palette {
    /// Palette for a geography/dataset pair.
    #[must_use]
    pub const fn for_map(geography: Geography, dataset: Dataset) -> Self {
        match (geography, dataset) {
            (Geography::Lsoa, Dataset::Ppfi) => PPFI_LSOA,
            (Geography::Lsoa, Dataset::Imd) => IMD_LSOA,
            (Geography::Lad, Dataset::Ppfi) => PPFI_LAD,
            (Geography::Lad, Dataset::Imd) => IMD_LAD,
        }
    }

    /// Colour stops evenly spaced over `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stops(&self) -> Vec<ColorStop> {
        let last = self.colors.len().saturating_sub(1).max(1) as f64;
        self.colors
            .iter()
            .enumerate()
            .map(|(i, color)| (i as f64 / last, *color))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decile_palettes_have_one_colour_per_decile() {
        for dataset in Dataset::ALL {
            assert_eq!(Palette::for_map(Geography::Lsoa, *dataset).colors.len(), 10);
        }
    }

    #[test]
    fn stops_span_zero_to_one() {
        for geography in Geography::ALL {
            for dataset in Dataset::ALL {
                let stops = Palette::for_map(*geography, *dataset).stops();
                assert!(stops.first().unwrap().0.abs() < f64::EPSILON);
                assert!((stops.last().unwrap().0 - 1.0).abs() < f64::EPSILON);
                assert!(stops.windows(2).all(|w| w[0].0 < w[1].0));
            }
        }
    }

    #[test]
    fn datasets_are_distinguishable() {
        assert_ne!(
            Palette::for_map(Geography::Lad, Dataset::Ppfi),
            Palette::for_map(Geography::Lad, Dataset::Imd)
        );
        assert_eq!(Palette::for_map(Geography::Lad, Dataset::Imd).name, "Greens_r");
    }
}
