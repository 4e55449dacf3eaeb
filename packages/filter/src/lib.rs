#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure filters over geographic tables.
//!
//! Every filter takes a [`TableView`] and returns a new, narrower view;
//! the rows themselves are never copied or mutated. A filter whose input
//! is empty or whose column is missing returns its input unchanged.
//!
//! LSOA maps combine the decile and drill-down filters (in either order,
//! both are row predicates); LAD maps use the rank-percentile filter.

pub mod input;

use std::collections::BTreeSet;

use depriv_map_geography_models::{AreaUnit, IndexedRow, PARENT_CODE_COLUMN, TableView};

/// Keeps rows whose `column` value is one of `wanted`.
///
/// An empty `wanted` set, or a column the table does not have, leaves the
/// view unchanged.
#[must_use]
pub fn filter_by_deciles<'a, R: IndexedRow>(
    view: &TableView<'a, R>,
    column: &str,
    wanted: &BTreeSet<i64>,
) -> TableView<'a, R> {
    if wanted.is_empty() {
        return view.clone();
    }
    if !view.has_column(column) {
        log::debug!("Decile filter skipped: no column '{column}'");
        return view.clone();
    }

    view.retain(|row| row.value(column).is_some_and(|v| wanted.contains(&v)))
}

/// Keeps rows whose `column` rank is at most `percent`% of the largest
/// rank in `view`.
///
/// The cutoff is `floor(percent / 100 * max)`, so 100% keeps every row
/// with a value. `None`, a missing column, or a column with no values
/// leaves the view unchanged. Callers pass the full table so the cutoff
/// is relative to every district, not a previously narrowed subset.
#[must_use]
pub fn filter_by_rank_percent<'a, R: IndexedRow>(
    view: &TableView<'a, R>,
    column: &str,
    percent: Option<i64>,
) -> TableView<'a, R> {
    let Some(percent) = percent else {
        return view.clone();
    };
    if !view.has_column(column) {
        log::debug!("Rank filter skipped: no column '{column}'");
        return view.clone();
    }
    let Some(max) = view.max(column) else {
        return view.clone();
    };

    let cutoff = rank_cutoff(percent, max);
    view.retain(|row| row.value(column).is_some_and(|v| v <= cutoff))
}

/// `floor(percent / 100 * max)` in exact integer arithmetic.
#[must_use]
pub fn rank_cutoff(percent: i64, max: i64) -> i64 {
    (percent.clamp(0, 100) * max).div_euclid(100)
}

/// Keeps LSOAs whose parent LAD is `district_code`.
///
/// `None`, or a table that was never joined to LADs, leaves the view
/// unchanged.
#[must_use]
pub fn filter_by_district<'a>(
    view: &TableView<'a, AreaUnit>,
    district_code: Option<&str>,
) -> TableView<'a, AreaUnit> {
    let Some(code) = district_code else {
        return view.clone();
    };
    if !view.has_column(PARENT_CODE_COLUMN) {
        log::debug!("District filter skipped: LSOAs have no parent codes");
        return view.clone();
    }

    view.retain(|area| area.district_code.as_deref() == Some(code))
}

/// Filter parameters for an LSOA map.
#[derive(Debug, Clone, Copy)]
pub struct FineFilter<'a> {
    /// Column the decile set applies to.
    pub column: &'a str,
    /// Wanted deciles (empty = all).
    pub deciles: &'a BTreeSet<i64>,
    /// Drill-down LAD code.
    pub district_code: Option<&'a str>,
}

impl FineFilter<'_> {
    /// Applies the decile and drill-down filters.
    #[must_use]
    pub fn apply<'t>(&self, view: &TableView<'t, AreaUnit>) -> TableView<'t, AreaUnit> {
        let by_decile = filter_by_deciles(view, self.column, self.deciles);
        let filtered = filter_by_district(&by_decile, self.district_code);
        log::debug!("LSOA filter kept {} of {} rows", filtered.len(), view.len());
        filtered
    }
}

/// Filter parameters for a LAD map.
#[derive(Debug, Clone, Copy)]
pub struct CoarseFilter<'a> {
    /// Column the percentage applies to.
    pub column: &'a str,
    /// Lowest-rank percentage (`None` = all).
    pub percent: Option<i64>,
}

impl CoarseFilter<'_> {
    /// Applies the rank-percentile filter.
    #[must_use]
    pub fn apply<'t, R: IndexedRow>(&self, view: &TableView<'t, R>) -> TableView<'t, R> {
        let filtered = filter_by_rank_percent(view, self.column, self.percent);
        log::debug!("LAD filter kept {} of {} rows", filtered.len(), view.len());
        filtered
    }
}
