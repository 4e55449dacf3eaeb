#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the deprivation map server.
//!
//! These types are serialized to JSON for the REST API. Selection changes
//! arrive as [`SelectionEvent`]s, one per user interaction.

use depriv_map_analytics_models::{MismatchColumn, SummaryStats};
use depriv_map_geography_models::ComparisonRecord;
use depriv_map_index_models::{Dataset, Geography, Panel, SelectionState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One user interaction that may change the selection state.
///
/// Filter values are passed through as raw JSON so that malformed input
/// from a widget degrades to "no filter" instead of a rejected request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SelectionEvent {
    /// Switch every map to a geography. Choosing LAD leaves any drill-down.
    SetGeography {
        /// New geography.
        geography: Geography,
    },
    /// Switch the single-map panel to a dataset.
    SetDataset {
        /// New dataset.
        dataset: Dataset,
    },
    /// Choose a domain for a panel.
    SetDomain {
        /// Target panel.
        panel: Panel,
        /// Domain key.
        domain: String,
    },
    /// Choose the wanted deciles for a panel.
    SetDeciles {
        /// Target panel.
        panel: Panel,
        /// A number, a numeric string, `"All"`, `null`, or a list.
        #[serde(default)]
        value: Value,
    },
    /// Choose the lowest-rank percentage for a panel.
    SetPercent {
        /// Target panel.
        panel: Panel,
        /// A number or numeric string; anything else clears the filter.
        #[serde(default)]
        value: Value,
    },
    /// A click on a map feature.
    ClickFeature {
        /// Clicked feature id, as sent by the chart library.
        #[serde(default)]
        location: Value,
    },
    /// Leave the drill-down.
    ClearDistrict,
}

/// Result of applying a [`SelectionEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSelection {
    /// Whether the event changed anything.
    pub changed: bool,
    /// State after the event.
    pub state: SelectionState,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// One entry of a domain dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainOption {
    /// Domain key.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// Query parameters for the domains endpoints. Missing fields default to
/// the current selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainsQueryParams {
    /// Geography to list domains for.
    pub geography: Option<Geography>,
    /// Dataset to list domains for.
    pub dataset: Option<Dataset>,
}

/// Summary statistics with their display lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    /// Raw values.
    pub stats: SummaryStats,
    /// Formatted lines for the summary panel.
    pub lines: Vec<String>,
}

/// Query parameters for the mismatch endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchQueryParams {
    /// Exact district name to restrict rows to.
    pub district: Option<String>,
}

/// Mismatch explorer table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMismatch<'a> {
    /// Column headers and field ids.
    pub columns: &'static [MismatchColumn],
    /// Rows, largest absolute difference first.
    pub rows: Vec<&'a ComparisonRecord>,
}
