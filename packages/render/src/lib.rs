#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth rendering for the deprivation map.
//!
//! [`render_map`] turns a filtered table into a [`Figure`]: it resolves the
//! colour column, picks a palette and a colour range that filtering never
//! changes, builds per-feature hover content, and frames the viewport.
//! The [`view`] module runs the whole filter-then-render pass for the
//! single and side-by-side views.
//!
//! Rendering only reads the geographic store. Figures are rebuilt on every
//! call and never cached.

pub mod hover;
pub mod palette;
pub mod view;
pub mod viewport;

#[cfg(test)]
mod fixtures;

use std::sync::Arc;

use depriv_map_domains::DomainRegistry;
use depriv_map_geography::GeoStore;
use depriv_map_geography_models::{
    AreaUnit, BoundingBox, District, IndexedRow, Table, TableView,
};
use depriv_map_index_models::{Dataset, DistrictSelection, Geography};
use depriv_map_render_models::{
    ChoroplethTrace, ColorBar, FEATURE_ID_KEY, Figure, HOVER_TEMPLATE, HoverMode, Layout, Marker,
    TRACE_TYPE, Viewport,
};
use geojson::FeatureCollection;
use thiserror::Error;

use crate::hover::HoverContext;
use crate::palette::Palette;

pub use view::{compare_view, filter_panel, single_view};

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The table has no values at all for the column the map is coloured
    /// by.
    #[error("{geography} table has no '{column}' column to colour {dataset} by")]
    MissingColumn {
        /// Geography of the table.
        geography: Geography,
        /// Dataset being drawn.
        dataset: Dataset,
        /// The absent column.
        column: String,
    },
}

/// Display parameters for one map.
#[derive(Debug, Clone, Copy)]
pub struct MapRequest<'a> {
    /// Dataset to colour by.
    pub dataset: Dataset,
    /// Requested domain key; unmapped keys fall back to `"combined"`.
    pub domain: &'a str,
    /// Drill-down district, named in the title.
    pub district: Option<&'a DistrictSelection>,
    /// Which hover lines to show.
    pub hover: HoverMode,
    /// Map framing.
    pub viewport: Viewport,
}

/// Rows left after filtering, at either geography.
#[derive(Debug, Clone)]
pub enum FilteredRows<'a> {
    /// LSOA rows.
    Areas(TableView<'a, AreaUnit>),
    /// LAD rows.
    Districts(TableView<'a, District>),
}

impl FilteredRows<'_> {
    /// Geography of the rows.
    #[must_use]
    pub const fn geography(&self) -> Geography {
        match self {
            Self::Areas(_) => Geography::Lsoa,
            Self::Districts(_) => Geography::Lad,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Areas(view) => view.len(),
            Self::Districts(view) => view.len(),
        }
    }

    /// Returns `true` if no rows are left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounding box of every row, or `None` if no row has coordinates.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Self::Areas(view) => view.bounding_box(),
            Self::Districts(view) => view.bounding_box(),
        }
    }
}

/// Renders filtered rows as a choropleth figure.
///
/// The colour range comes from the full table in `store`, so the same value
/// gets the same colour however the rows were filtered: deciles always span
/// 1-10 and ranks span 1 to the largest rank of the column.
///
/// # Errors
///
/// Returns [`RenderError::MissingColumn`] if the full table has no column
/// for the resolved domain. Missing optional columns only blank out hover
/// lines.
pub fn render_map(
    store: &GeoStore,
    registry: &DomainRegistry,
    request: &MapRequest<'_>,
    rows: &FilteredRows<'_>,
) -> Result<Figure, RenderError> {
    match rows {
        FilteredRows::Areas(view) => build_figure(
            Geography::Lsoa,
            store.areas(),
            view,
            store.area_features(),
            registry,
            store.district_count(),
            request,
        ),
        FilteredRows::Districts(view) => build_figure(
            Geography::Lad,
            store.districts(),
            view,
            store.district_features(),
            registry,
            store.district_count(),
            request,
        ),
    }
}

/// `"{DATASET} – {Domain} ({GEOGRAPHY})"`, followed by the drill-down
/// district's name if there is one.
#[must_use]
pub fn map_title(
    geography: Geography,
    dataset: Dataset,
    domain_key: &str,
    district: Option<&DistrictSelection>,
) -> String {
    let mut title = format!(
        "{} \u{2013} {} ({})",
        dataset.label(),
        depriv_map_domains::pretty_domain(domain_key),
        geography.label()
    );
    if let Some(district) = district {
        title.push_str(" \u{2013} ");
        title.push_str(&district.name);
    }
    title
}

fn build_figure<R: IndexedRow>(
    geography: Geography,
    full: &Table<R>,
    rows: &TableView<'_, R>,
    features: Arc<FeatureCollection>,
    registry: &DomainRegistry,
    district_count: usize,
    request: &MapRequest<'_>,
) -> Result<Figure, RenderError> {
    let domain = registry.resolve(geography, request.dataset, request.domain);

    if !full.has_column(domain.column) {
        return Err(RenderError::MissingColumn {
            geography,
            dataset: request.dataset,
            column: domain.column.to_string(),
        });
    }

    let (zmin, zmax) = match geography {
        Geography::Lsoa => (Some(1), Some(10)),
        Geography::Lad => full
            .view()
            .max(domain.column)
            .map_or((None, None), |max| (Some(1), Some(max))),
    };

    let palette = Palette::for_map(geography, request.dataset);
    let hover_context = HoverContext::new(
        registry,
        geography,
        request.dataset,
        domain,
        |column| full.has_column(column),
        district_count,
        request.hover,
    );

    let hover: Vec<_> = rows.iter().map(|row| hover_context.describe(row)).collect();
    let text = hover.iter().map(depriv_map_render_models::HoverInfo::to_html).collect();

    log::debug!(
        "Rendering {} {} rows coloured by '{}' with {}",
        rows.len(),
        geography,
        domain.column,
        palette.name
    );

    let trace = ChoroplethTrace {
        kind: TRACE_TYPE,
        geojson: features,
        locations: rows.iter().map(|row| row.code().to_string()).collect(),
        featureidkey: FEATURE_ID_KEY,
        z: rows.iter().map(|row| row.value(domain.column)).collect(),
        zmin,
        zmax,
        colorscale: palette.stops(),
        colorbar: ColorBar::titled(match geography {
            Geography::Lsoa => "Decile",
            Geography::Lad => "Rank",
        }),
        marker: Marker::default(),
        text,
        hovertemplate: HOVER_TEMPLATE,
        hover,
    };

    let title = map_title(geography, request.dataset, domain.key, request.district);

    Ok(Figure {
        data: vec![trace],
        layout: Layout::new(title, request.viewport),
    })
}

#[cfg(test)]
mod tests {
    use depriv_map_filter::CoarseFilter;

    use super::*;
    use crate::fixtures;

    fn request(dataset: Dataset, domain: &str) -> MapRequest<'_> {
        MapRequest {
            dataset,
            domain,
            district: None,
            hover: HoverMode::Full,
            viewport: Viewport::DEFAULT,
        }
    }

    #[test]
    fn unfiltered_lsoa_map_covers_every_row() {
        let (store, registry) = fixtures::store();
        let rows = FilteredRows::Areas(store.areas().view());

        let figure = render_map(&store, &registry, &request(Dataset::Ppfi, "combined"), &rows)
            .unwrap();
        let trace = figure.trace().unwrap();

        assert_eq!(trace.locations.len(), store.areas().len());
        assert_eq!(trace.z.len(), trace.locations.len());
        assert_eq!(trace.text.len(), trace.locations.len());
        assert_eq!((trace.zmin, trace.zmax), (Some(1), Some(10)));
        assert_eq!(trace.colorbar.title.text, "Decile");
        assert_eq!(figure.layout.title.text, "PPFI \u{2013} Combined (LSOA)");
        assert_eq!(figure.layout.viewport(), Viewport::DEFAULT);
    }

    #[test]
    fn locations_match_feature_ids() {
        let (store, registry) = fixtures::store();
        let rows = FilteredRows::Districts(store.districts().view());
        let figure = render_map(&store, &registry, &request(Dataset::Imd, "income"), &rows)
            .unwrap();
        let trace = figure.trace().unwrap();

        let ids: Vec<&str> = trace
            .geojson
            .features
            .iter()
            .filter_map(depriv_map_geography::feature_id)
            .collect();
        assert!(trace.locations.iter().all(|code| ids.contains(&code.as_str())));
        assert_eq!(figure.layout.title.text, "IMD \u{2013} Income (LAD)");
    }

    #[test]
    fn lad_colour_range_is_stable_under_filtering() {
        let (store, registry) = fixtures::store();
        let full = store.districts().view();
        let column = registry.resolve(Geography::Lad, Dataset::Imd, "combined").column;

        let narrowed = CoarseFilter {
            column,
            percent: Some(25),
        }
        .apply(&full);
        assert_eq!(narrowed.len(), 1);

        let req = request(Dataset::Imd, "combined");
        let all = render_map(&store, &registry, &req, &FilteredRows::Districts(full)).unwrap();
        let one = render_map(&store, &registry, &req, &FilteredRows::Districts(narrowed)).unwrap();

        let range = |f: &Figure| {
            let t = f.trace().unwrap();
            (t.zmin, t.zmax)
        };
        assert_eq!(range(&all), range(&one));
        assert_eq!(range(&all), (Some(1), Some(fixtures::DISTRICT_COUNT)));
    }

    #[test]
    fn unknown_domain_falls_back_to_combined() {
        let (store, registry) = fixtures::store();
        let rows = FilteredRows::Areas(store.areas().view());
        let figure = render_map(&store, &registry, &request(Dataset::Imd, "nonsense"), &rows)
            .unwrap();
        assert_eq!(figure.layout.title.text, "IMD \u{2013} Combined (LSOA)");
    }

    #[test]
    fn absent_colour_column_is_an_error() {
        let (store, registry) = fixtures::store();
        let rows = FilteredRows::Areas(store.areas().view());
        // The fixture omits the IMD health column.
        let err = render_map(&store, &registry, &request(Dataset::Imd, "health"), &rows)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::MissingColumn { geography: Geography::Lsoa, .. }
        ));
    }

    #[test]
    fn drill_down_title_names_the_district() {
        let district = DistrictSelection {
            code: "E07000001".to_string(),
            name: "Ashford".to_string(),
        };
        assert_eq!(
            map_title(Geography::Lsoa, Dataset::Ppfi, "fuel poverty", Some(&district)),
            "PPFI \u{2013} Fuel Poverty (LSOA) \u{2013} Ashford"
        );
    }

    #[test]
    fn figure_serializes_for_the_chart_library() {
        let (store, registry) = fixtures::store();
        let rows = FilteredRows::Areas(store.areas().view());
        let figure = render_map(&store, &registry, &request(Dataset::Ppfi, "combined"), &rows)
            .unwrap();
        let value = serde_json::to_value(&figure).unwrap();

        assert_eq!(value["data"][0]["type"], "choroplethmapbox");
        assert_eq!(value["data"][0]["featureidkey"], "properties.id");
        assert_eq!(value["data"][0]["geojson"]["type"], "FeatureCollection");
        assert_eq!(value["layout"]["mapbox"]["style"], "carto-positron");
    }
}
