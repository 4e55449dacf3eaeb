#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth figure types.
//!
//! A [`Figure`] serializes to the `{ data, layout }` shape a Plotly
//! `choroplethmapbox` chart accepts, so the frontend can hand it to the
//! charting library unchanged. The feature collection is shared behind an
//! `Arc` with the geographic store rather than copied per figure.

use std::sync::Arc;

use geojson::FeatureCollection;
use serde::Serialize;

/// Trace type understood by the frontend charting library.
pub const TRACE_TYPE: &str = "choroplethmapbox";

/// Feature property the trace joins `locations` against.
pub const FEATURE_ID_KEY: &str = "properties.id";

/// Map tile style.
pub const MAP_STYLE: &str = "carto-positron";

/// Hover template that shows the pre-rendered `text` and nothing else.
pub const HOVER_TEMPLATE: &str = "%{text}<extra></extra>";

/// A rendered map: one trace plus its layout.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    /// Traces, in draw order.
    pub data: Vec<ChoroplethTrace>,
    /// Map, title, and interaction settings.
    pub layout: Layout,
}

impl Figure {
    /// The first (and only) trace.
    #[must_use]
    pub fn trace(&self) -> Option<&ChoroplethTrace> {
        self.data.first()
    }
}

/// The two maps of the side-by-side view.
#[derive(Debug, Clone, Serialize)]
pub struct CompareFigures {
    /// PPFI map.
    pub left: Figure,
    /// IMD map.
    pub right: Figure,
}

/// One `(position, colour)` stop of a colour scale.
pub type ColorStop = (f64, &'static str);

/// A filled-polygon choropleth layer.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethTrace {
    /// Always [`TRACE_TYPE`].
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Boundaries for every row of the source table, filtered or not.
    pub geojson: Arc<FeatureCollection>,
    /// Row codes, one per drawn feature.
    pub locations: Vec<String>,
    /// Always [`FEATURE_ID_KEY`].
    pub featureidkey: &'static str,
    /// Colour values, aligned with `locations`.
    pub z: Vec<Option<i64>>,
    /// Lower bound of the colour range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zmin: Option<i64>,
    /// Upper bound of the colour range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zmax: Option<i64>,
    /// Colour stops from 0.0 to 1.0.
    pub colorscale: Vec<ColorStop>,
    /// Legend bar settings.
    pub colorbar: ColorBar,
    /// Polygon styling.
    pub marker: Marker,
    /// Pre-rendered hover HTML, aligned with `locations`.
    pub text: Vec<String>,
    /// Always [`HOVER_TEMPLATE`].
    pub hovertemplate: &'static str,
    /// Structured hover content, aligned with `locations`.
    #[serde(skip)]
    pub hover: Vec<HoverInfo>,
}

/// Colour bar settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    /// Title text (`"Decile"` or `"Rank"`).
    pub title: ColorBarTitle,
    /// Bar thickness in pixels.
    pub thickness: u32,
    /// Bar length as a fraction of the plot height.
    pub len: f64,
    /// Vertical anchor as a fraction of the plot height.
    pub y: f64,
}

impl ColorBar {
    /// Standard colour bar with the given title.
    #[must_use]
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: ColorBarTitle { text: text.into() },
            thickness: 12,
            len: 0.5,
            y: 0.5,
        }
    }
}

/// Colour bar title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorBarTitle {
    /// Title text.
    pub text: String,
}

/// Polygon fill and outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// Fill opacity.
    pub opacity: f64,
    /// Outline settings.
    pub line: MarkerLine,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            opacity: 0.85,
            line: MarkerLine { width: 0.3 },
        }
    }
}

/// Polygon outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerLine {
    /// Outline width in pixels.
    pub width: f64,
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Base map settings.
    pub mapbox: MapboxLayout,
    /// Drag interaction (`"zoom"`).
    pub dragmode: &'static str,
    /// Click interaction (`"event+select"`), so clicks reach the server.
    pub clickmode: &'static str,
    /// Constant revision so the frontend keeps the user's pan and zoom
    /// between updates of the same figure.
    pub uirevision: &'static str,
    /// Centered title.
    pub title: Title,
    /// Plot margins in pixels.
    pub margin: Margin,
}

impl Layout {
    /// Layout with the given title and viewport and the standard
    /// interaction settings.
    #[must_use]
    pub fn new(title: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            mapbox: MapboxLayout {
                style: MAP_STYLE,
                zoom: viewport.zoom,
                center: viewport.center,
            },
            dragmode: "zoom",
            clickmode: "event+select",
            uirevision: "keep",
            title: Title {
                text: title.into(),
                x: 0.5,
            },
            margin: Margin {
                l: 0,
                r: 0,
                t: 40,
                b: 0,
            },
        }
    }

    /// The viewport this layout shows.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport {
            center: self.mapbox.center,
            zoom: self.mapbox.zoom,
        }
    }
}

/// Base map settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapboxLayout {
    /// Tile style.
    pub style: &'static str,
    /// Zoom level.
    pub zoom: f64,
    /// Map center.
    pub center: LatLon,
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Figure title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// Title text.
    pub text: String,
    /// Horizontal position as a fraction of the plot width.
    pub x: f64,
}

/// Plot margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    /// Left.
    pub l: u32,
    /// Right.
    pub r: u32,
    /// Top.
    pub t: u32,
    /// Bottom.
    pub b: u32,
}

/// Map center and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Map center.
    pub center: LatLon,
    /// Zoom level.
    pub zoom: f64,
}

impl Viewport {
    /// View covering all of England.
    pub const DEFAULT: Self = Self {
        center: LatLon {
            lat: 53.7,
            lon: -1.5,
        },
        zoom: 5.3,
    };
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Which hover lines a figure shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverMode {
    /// Name, both combined values, their difference, the alignment label,
    /// and the active domain's value.
    #[default]
    Full,
    /// Name and the active domain's value only (side-by-side view).
    Compact,
}

/// Hover content for one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverInfo {
    /// Bold first line (the area name).
    pub title: String,
    /// Remaining lines. An empty string renders as a blank line.
    pub lines: Vec<String>,
}

impl HoverInfo {
    /// Renders the content as hover HTML, escaping the text.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = format!("<b>{}</b>", escape_html(&self.title));
        for line in &self.lines {
            out.push_str("<br>");
            out.push_str(&escape_html(line));
        }
        out
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_html_escapes_and_keeps_blank_lines() {
        let hover = HoverInfo {
            title: "Barking & Dagenham".to_string(),
            lines: vec![String::new(), "PPFI combined (rank): 12".to_string()],
        };
        assert_eq!(
            hover.to_html(),
            "<b>Barking &amp; Dagenham</b><br><br>PPFI combined (rank): 12"
        );
    }

    #[test]
    fn layout_serializes_in_chart_shape() {
        let layout = Layout::new("PPFI – Combined (LAD)", Viewport::DEFAULT);
        let value = serde_json::to_value(&layout).unwrap();

        assert_eq!(value["mapbox"]["style"], "carto-positron");
        assert_eq!(value["mapbox"]["zoom"], 5.3);
        assert_eq!(value["mapbox"]["center"]["lat"], 53.7);
        assert_eq!(value["mapbox"]["center"]["lon"], -1.5);
        assert_eq!(value["clickmode"], "event+select");
        assert_eq!(value["uirevision"], "keep");
        assert_eq!(value["title"]["x"], 0.5);
        assert_eq!(value["margin"]["t"], 40);
        assert_eq!(layout.viewport(), Viewport::DEFAULT);
    }

    #[test]
    fn trace_omits_unset_range_and_hover_structs() {
        let trace = ChoroplethTrace {
            kind: TRACE_TYPE,
            geojson: Arc::new(FeatureCollection {
                bbox: None,
                features: vec![],
                foreign_members: None,
            }),
            locations: vec!["E01000001".to_string()],
            featureidkey: FEATURE_ID_KEY,
            z: vec![None],
            zmin: None,
            zmax: None,
            colorscale: vec![(0.0, "#000000"), (1.0, "#ffffff")],
            colorbar: ColorBar::titled("Rank"),
            marker: Marker::default(),
            text: vec![String::new()],
            hovertemplate: HOVER_TEMPLATE,
            hover: vec![],
        };
        let value = serde_json::to_value(&trace).unwrap();

        assert_eq!(value["type"], "choroplethmapbox");
        assert!(value.get("zmin").is_none());
        assert!(value.get("hover").is_none());
        assert_eq!(value["z"][0], serde_json::Value::Null);
        assert_eq!(value["colorscale"][1][1], "#ffffff");
        assert_eq!(value["colorbar"]["thickness"], 12);
        assert_eq!(value["marker"]["line"]["width"], 0.3);
    }
}
