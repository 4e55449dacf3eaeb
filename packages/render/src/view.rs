//! Filter-then-render passes for the single and side-by-side views.

use depriv_map_domains::DomainRegistry;
use depriv_map_filter::{CoarseFilter, FineFilter};
use depriv_map_geography::GeoStore;
use depriv_map_index_models::{DistrictSelection, Geography, PanelSelection, SelectionState};
use depriv_map_render_models::{CompareFigures, Figure, HoverMode, Viewport};

use crate::viewport::fit_first;
use crate::{FilteredRows, MapRequest, RenderError, render_map};

/// Applies one panel's filters to the full table at `geography`.
///
/// LSOAs are narrowed by the decile set and the drill-down district; LADs
/// by the lowest-rank percentage, measured against every district.
#[must_use]
pub fn filter_panel<'a>(
    store: &'a GeoStore,
    registry: &DomainRegistry,
    geography: Geography,
    panel: &PanelSelection,
    district: Option<&DistrictSelection>,
) -> FilteredRows<'a> {
    let column = registry
        .resolve(geography, panel.dataset, &panel.domain)
        .column;

    match geography {
        Geography::Lsoa => FilteredRows::Areas(
            FineFilter {
                column,
                deciles: &panel.deciles,
                district_code: district.map(|d| d.code.as_str()),
            }
            .apply(&store.areas().view()),
        ),
        Geography::Lad => FilteredRows::Districts(
            CoarseFilter {
                column,
                percent: panel.percent,
            }
            .apply(&store.districts().view()),
        ),
    }
}

/// Drill-down district, if the state is drilled down at LSOA level.
fn drill_down(state: &SelectionState) -> Option<&DistrictSelection> {
    match state.geography {
        Geography::Lsoa => state.district.as_ref(),
        Geography::Lad => None,
    }
}

/// Renders the single-map view.
///
/// # Errors
///
/// Returns [`RenderError`] if the panel's colour column is absent.
pub fn single_view(
    store: &GeoStore,
    registry: &DomainRegistry,
    state: &SelectionState,
) -> Result<Figure, RenderError> {
    let district = drill_down(state);
    let rows = filter_panel(store, registry, state.geography, &state.single, district);

    let viewport = if district.is_some() {
        fit_first([rows.bounding_box()])
    } else {
        Viewport::DEFAULT
    };

    render_map(
        store,
        registry,
        &MapRequest {
            dataset: state.single.dataset,
            domain: &state.single.domain,
            district,
            hover: HoverMode::Full,
            viewport,
        },
        &rows,
    )
}

/// Renders the side-by-side view.
///
/// Each side is filtered with its own panel settings. When drilled down,
/// both sides share one viewport framed on the left side's rows, or the
/// right side's if the left has none.
///
/// # Errors
///
/// Returns [`RenderError`] if either panel's colour column is absent.
pub fn compare_view(
    store: &GeoStore,
    registry: &DomainRegistry,
    state: &SelectionState,
) -> Result<CompareFigures, RenderError> {
    let district = drill_down(state);
    let left = filter_panel(store, registry, state.geography, &state.left, district);
    let right = filter_panel(store, registry, state.geography, &state.right, district);

    let viewport = if district.is_some() {
        fit_first([left.bounding_box(), right.bounding_box()])
    } else {
        Viewport::DEFAULT
    };

    let render = |panel: &PanelSelection, rows: &FilteredRows<'_>| {
        render_map(
            store,
            registry,
            &MapRequest {
                dataset: panel.dataset,
                domain: &panel.domain,
                district,
                hover: HoverMode::Compact,
                viewport,
            },
            rows,
        )
    };

    Ok(CompareFigures {
        left: render(&state.left, &left)?,
        right: render(&state.right, &right)?,
    })
}
