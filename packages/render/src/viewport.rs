//! Viewport framing for drill-down maps.

use depriv_map_geography_models::BoundingBox;
use depriv_map_render_models::{LatLon, Viewport};

/// Zoom bounds for a fitted viewport.
pub const MIN_ZOOM: f64 = 5.3;
/// See [`MIN_ZOOM`].
pub const MAX_ZOOM: f64 = 10.5;
/// Zoom used when the box has no extent.
pub const POINT_ZOOM: f64 = 9.5;

/// Centers on `bbox` with a zoom that shrinks as its larger side grows.
///
/// `zoom = clamp(8.5 - log2(span + 1e-9), 5.3, 10.5)` where `span` is the
/// larger of width and height in degrees.
#[must_use]
pub fn fit(bbox: &BoundingBox) -> Viewport {
    let (lon, lat) = bbox.center();
    let span = bbox.width().max(bbox.height());

    let zoom = if span > 0.0 {
        (8.5 - (span + 1e-9).log2()).clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        POINT_ZOOM
    };

    Viewport {
        center: LatLon { lat, lon },
        zoom,
    }
}

/// Fits the first box present, or falls back to the national view.
#[must_use]
pub fn fit_first(candidates: impl IntoIterator<Item = Option<BoundingBox>>) -> Viewport {
    candidates
        .into_iter()
        .flatten()
        .next()
        .map_or(Viewport::DEFAULT, |bbox| fit(&bbox))
}
