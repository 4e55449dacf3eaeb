//! Alignment bands between the two indices' combined values.
//!
//! LSOA differences are on the decile scale and use fixed thresholds. LAD
//! differences are on the rank scale, whose size depends on the number of
//! districts, so the thresholds scale with it.

use depriv_map_analytics_models::{Alignment, AlignmentStrength, Direction};
use depriv_map_index_models::Geography;

/// Inclusive upper bounds on `|difference|` for the slight and moderate
/// bands. Anything larger is strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentThresholds {
    /// Largest absolute difference labelled slight.
    pub slight: i64,
    /// Largest absolute difference labelled moderate.
    pub moderate: i64,
}

impl AlignmentThresholds {
    /// Thresholds for a geography. `district_count` is only used for LADs.
    ///
    /// LSOA: 1 is slight, 2-3 moderate. LAD: slight up to 10% of the
    /// district count (at least 1), moderate up to 25% (at least one more
    /// than slight). Percentages round half to even.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn for_geography(geography: Geography, district_count: usize) -> Self {
        match geography {
            Geography::Lsoa => Self {
                slight: 1,
                moderate: 3,
            },
            Geography::Lad => {
                let n = district_count as f64;
                let slight = ((0.10 * n).round_ties_even() as i64).max(1);
                let moderate = ((0.25 * n).round_ties_even() as i64).max(slight + 1);
                Self { slight, moderate }
            }
        }
    }

    /// Band for an absolute difference.
    #[must_use]
    pub const fn strength(&self, abs_difference: i64) -> AlignmentStrength {
        if abs_difference == 0 {
            AlignmentStrength::Closely
        } else if abs_difference <= self.slight {
            AlignmentStrength::Slightly
        } else if abs_difference <= self.moderate {
            AlignmentStrength::Moderately
        } else {
            AlignmentStrength::Strongly
        }
    }
}

/// Classifies `difference` (PPFI minus IMD combined value).
///
/// Returns `None` when the difference is unknown, which renders as an
/// empty hover line.
#[must_use]
pub fn classify(
    difference: Option<i64>,
    geography: Geography,
    district_count: usize,
) -> Option<Alignment> {
    let difference = difference?;

    let direction = match difference.signum() {
        1 => Some(Direction::PpfiHigher),
        -1 => Some(Direction::ImdHigher),
        _ => None,
    };

    let strength = AlignmentThresholds::for_geography(geography, district_count)
        .strength(difference.saturating_abs());

    Some(Alignment {
        strength,
        direction,
    })
}
