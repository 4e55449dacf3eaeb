#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geography, dataset, and selection state types for the deprivation map.
//!
//! These types are shared by every layer of the dashboard: the domain
//! registry keys its tables by ([`Geography`], [`Dataset`]), the filter
//! engine and renderer consume a [`SelectionState`], and the server
//! serializes it back to the frontend.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Domain key of the aggregate index value, present for every
/// geography/dataset pair.
pub const COMBINED: &str = "combined";

/// Geography level a map is drawn at.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Geography {
    /// Lower Super Output Area. Fine-grained, decile-valued.
    Lsoa,
    /// Local Authority District. Coarse-grained, rank-valued.
    Lad,
}

impl Geography {
    /// Both geography levels, fine first.
    pub const ALL: &[Self] = &[Self::Lsoa, Self::Lad];

    /// Upper-case label used in figure titles (e.g. `"LSOA"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lsoa => "LSOA",
            Self::Lad => "LAD",
        }
    }

    /// Name of the value scale at this geography.
    #[must_use]
    pub const fn scale_name(self) -> &'static str {
        match self {
            Self::Lsoa => "decile",
            Self::Lad => "rank",
        }
    }
}

/// One of the two compared deprivation indices.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Dataset {
    /// Priority Places for Food Index (the food-access index).
    Ppfi,
    /// Index of Multiple Deprivation.
    Imd,
}

impl Dataset {
    /// Both datasets, PPFI first.
    pub const ALL: &[Self] = &[Self::Ppfi, Self::Imd];

    /// Upper-case label used in titles and hover text (e.g. `"PPFI"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ppfi => "PPFI",
            Self::Imd => "IMD",
        }
    }
}

/// Which panel of the dashboard an event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Panel {
    /// The single-map view.
    Single,
    /// Left side of the side-by-side view (always PPFI).
    Left,
    /// Right side of the side-by-side view (always IMD).
    Right,
}

/// Per-panel dataset, domain, and filter choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSelection {
    /// Dataset this panel colours by.
    pub dataset: Dataset,
    /// Domain key (validated against the registry, `"combined"` fallback).
    pub domain: String,
    /// Wanted deciles at LSOA geography. Empty means no filtering.
    pub deciles: BTreeSet<i64>,
    /// Lowest-rank percentage at LAD geography (0-100). `None` means no
    /// filtering.
    pub percent: Option<i64>,
}

impl PanelSelection {
    /// A panel on `dataset` showing the combined domain, unfiltered.
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            domain: COMBINED.to_string(),
            deciles: BTreeSet::new(),
            percent: Some(100),
        }
    }
}

/// A district chosen by clicking it on the LAD map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictSelection {
    /// LAD code (e.g. `"E07000001"`).
    pub code: String,
    /// LAD display name.
    pub name: String,
}

/// The user's current choices, owned by the hosting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    /// Geography shared by every map.
    pub geography: Geography,
    /// Single-map panel.
    pub single: PanelSelection,
    /// Left compare panel (PPFI).
    pub left: PanelSelection,
    /// Right compare panel (IMD).
    pub right: PanelSelection,
    /// Drill-down district, if any.
    pub district: Option<DistrictSelection>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            geography: Geography::Lad,
            single: PanelSelection::new(Dataset::Ppfi),
            left: PanelSelection::new(Dataset::Ppfi),
            right: PanelSelection::new(Dataset::Imd),
            district: None,
        }
    }
}

impl SelectionState {
    /// Returns the panel an event targets.
    #[must_use]
    pub const fn panel(&self, panel: Panel) -> &PanelSelection {
        match panel {
            Panel::Single => &self.single,
            Panel::Left => &self.left,
            Panel::Right => &self.right,
        }
    }

    /// Returns the panel an event targets, mutably.
    pub const fn panel_mut(&mut self, panel: Panel) -> &mut PanelSelection {
        match panel {
            Panel::Single => &mut self.single,
            Panel::Left => &mut self.left,
            Panel::Right => &mut self.right,
        }
    }
}
