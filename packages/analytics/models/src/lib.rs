#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Alignment, summary statistic, and mismatch table types.
//!
//! An [`Alignment`] describes how far apart the two indices' combined
//! values are for one area and which index shows the higher
//! vulnerability. [`SummaryStats`] and [`MismatchColumn`] describe the
//! statistics and mismatch explorer panels.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How far apart the two indices are, weakest first.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlignmentStrength {
    /// Identical values.
    Closely,
    /// Small disagreement.
    Slightly,
    /// Noticeable disagreement.
    Moderately,
    /// Large disagreement.
    Strongly,
}

impl AlignmentStrength {
    /// Capitalized adverb used at the start of a label.
    #[must_use]
    pub const fn adverb(self) -> &'static str {
        match self {
            Self::Closely => "Closely",
            Self::Slightly => "Slightly",
            Self::Moderately => "Moderately",
            Self::Strongly => "Strongly",
        }
    }
}

/// Which index shows the higher vulnerability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    /// PPFI minus IMD is positive.
    PpfiHigher,
    /// PPFI minus IMD is negative.
    ImdHigher,
}

impl Direction {
    /// Sentence describing the direction.
    #[must_use]
    pub const fn sentence(self) -> &'static str {
        match self {
            Self::PpfiHigher => {
                "Food-related vulnerability is higher than general deprivation in this area."
            }
            Self::ImdHigher => {
                "General deprivation is higher than food-related vulnerability in this area."
            }
        }
    }
}

/// Qualitative comparison of two combined index values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    /// Size of the disagreement.
    pub strength: AlignmentStrength,
    /// Which index is higher. `None` exactly when the values are equal.
    pub direction: Option<Direction>,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            None => write!(f, "Alignment: {} aligned", self.strength.adverb()),
            Some(direction) => write!(
                f,
                "{} misaligned: {}",
                self.strength.adverb(),
                direction.sentence()
            ),
        }
    }
}

/// Headline statistics over the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Number of comparison rows.
    pub total: usize,
    /// Pearson correlation of the two combined deciles over rows where both
    /// are present. `None` if fewer than two such rows or no variance.
    pub correlation: Option<f64>,
    /// Share of rows with `|diff| <= 1`.
    pub within_one_share: f64,
    /// Share of rows with `diff < 0` (PPFI decile below IMD decile).
    pub negative_share: f64,
    /// Share of rows with `diff > 0` (PPFI decile above IMD decile).
    pub positive_share: f64,
}

/// A column of the mismatch explorer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchColumn {
    /// Header text.
    pub name: &'static str,
    /// Field of the serialized comparison record.
    pub id: &'static str,
    /// Whether the display layer should sort numerically.
    pub numeric: bool,
}
