//! Reads the boundary `GeoJSON` files and the mismatch CSV into a
//! [`GeoStore`].
//!
//! Boundaries must already be in longitude/latitude. Codes are trimmed
//! and upper-cased, each LSOA is joined to the first LAD the CSV lists for
//! it, and every value column named in the domain registry is coerced to
//! an integer (numbers or numeric strings; anything else becomes null).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use depriv_map_domains::DomainRegistry;
use depriv_map_geography_models::{
    AreaUnit, ComparisonRecord, District, PARENT_CODE_COLUMN, Table,
};
use depriv_map_index_models::Geography;
use geo::MultiPolygon;
use geojson::{FeatureCollection, GeoJson, JsonObject};
use serde::Deserialize;

use crate::{GeoError, GeoStore};

/// Property holding the LSOA code.
const LSOA_CODE_PROPERTY: &str = "LSOA21CD";

/// Property holding the LAD code.
const LAD_CODE_PROPERTY: &str = "LAD24CD";

/// Candidate LSOA name properties, most specific first.
const LSOA_NAME_PROPERTIES: &[&str] = &["LSOA21NM_x", "LSOA21NM", "LSOA11NM", "lsoa_name", "name"];

/// Candidate LAD name properties, most specific first.
const LAD_NAME_PROPERTIES: &[&str] = &[
    "LAD24NM_y",
    "LAD24NM",
    "LAD24NM_x",
    "LAD23NM",
    "LAD22NM",
    "LAD21NM",
    "lad_name",
    "NAME",
    "name",
];

/// Locations of the three input files.
#[derive(Debug, Clone)]
pub struct DataPaths {
    /// LSOA boundaries with PPFI and IMD deciles.
    pub lsoa_geojson: PathBuf,
    /// LAD boundaries with PPFI and IMD ranks.
    pub lad_geojson: PathBuf,
    /// Per-LSOA combined decile comparison.
    pub mismatch_csv: PathBuf,
}

impl DataPaths {
    /// The standard file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            lsoa_geojson: dir.join("ppfi_imd_lsoa_england.geojson"),
            lad_geojson: dir.join("ppfi_imd_lad_england.geojson"),
            mismatch_csv: dir.join("imd_ppfi_mismatch.csv"),
        }
    }
}

/// One CSV row before coercion.
#[derive(Debug, Deserialize)]
struct RawComparisonRow {
    #[serde(default)]
    lsoa21cd: Option<String>,
    #[serde(default)]
    lsoa21nm: Option<String>,
    #[serde(default)]
    lad24cd: Option<String>,
    #[serde(default)]
    lad24nm: Option<String>,
    #[serde(default)]
    pp_dec_combined: Option<String>,
    #[serde(default)]
    imd_decile: Option<String>,
    #[serde(default)]
    ppfi_imd_diff: Option<String>,
}

/// Loads the store from files on disk.
///
/// # Errors
///
/// Returns [`GeoError`] if a file cannot be read or parsed, or if a table
/// and its features disagree.
pub fn load(paths: &DataPaths, registry: &DomainRegistry) -> Result<GeoStore, GeoError> {
    log::info!("Loading LSOA boundaries from {}", paths.lsoa_geojson.display());
    let lsoa = std::fs::read_to_string(&paths.lsoa_geojson)?;

    log::info!("Loading LAD boundaries from {}", paths.lad_geojson.display());
    let lad = std::fs::read_to_string(&paths.lad_geojson)?;

    log::info!("Loading comparison table from {}", paths.mismatch_csv.display());
    let csv = std::fs::read_to_string(&paths.mismatch_csv)?;

    parse(&lsoa, &lad, &csv, registry)
}

/// Builds the store from in-memory file contents.
///
/// # Errors
///
/// Returns [`GeoError`] if any input fails to parse or a table and its
/// features disagree.
pub fn parse(
    lsoa_geojson: &str,
    lad_geojson: &str,
    mismatch_csv: &str,
    registry: &DomainRegistry,
) -> Result<GeoStore, GeoError> {
    let comparison = parse_comparison(mismatch_csv)?;

    let mut parents: BTreeMap<&str, &str> = BTreeMap::new();
    for record in &comparison {
        if let Some(lad) = record.lad_code.as_deref() {
            parents.entry(record.lsoa_code.as_str()).or_insert(lad);
        }
    }

    let lsoa_columns = registry.columns_for(Geography::Lsoa);
    let (mut area_columns, area_rows) =
        parse_rows(lsoa_geojson, LSOA_CODE_PROPERTY, LSOA_NAME_PROPERTIES, &lsoa_columns)?;
    area_columns.insert(PARENT_CODE_COLUMN.to_string());

    let areas: Vec<AreaUnit> = area_rows
        .into_iter()
        .map(|row| AreaUnit {
            district_code: parents.get(row.code.as_str()).map(|s| (*s).to_string()),
            code: row.code,
            name: row.name,
            geometry: row.geometry,
            values: row.values,
        })
        .collect();

    let unmatched = areas.iter().filter(|a| a.district_code.is_none()).count();
    if unmatched > 0 {
        log::warn!("{unmatched} LSOAs have no parent LAD in the comparison table");
    }

    let lad_columns = registry.columns_for(Geography::Lad);
    let (district_columns, district_rows) =
        parse_rows(lad_geojson, LAD_CODE_PROPERTY, LAD_NAME_PROPERTIES, &lad_columns)?;

    let districts: Vec<District> = district_rows
        .into_iter()
        .map(|row| District {
            code: row.code,
            name: row.name,
            geometry: row.geometry,
            values: row.values,
        })
        .collect();

    GeoStore::from_tables(
        Table::new(area_columns, areas),
        Table::new(district_columns, districts),
        comparison,
    )
}

/// A feature reduced to the fields both tables share.
struct ParsedRow {
    code: String,
    name: String,
    geometry: MultiPolygon<f64>,
    values: BTreeMap<String, Option<i64>>,
}

/// Parses a feature collection into rows, returning the value columns
/// that at least one feature carried.
fn parse_rows(
    geojson: &str,
    code_property: &str,
    name_properties: &[&str],
    value_columns: &BTreeSet<&str>,
) -> Result<(BTreeSet<String>, Vec<ParsedRow>), GeoError> {
    let collection = FeatureCollection::try_from(geojson.parse::<GeoJson>()?)?;

    let mut present = BTreeSet::new();
    let mut rows = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let empty = JsonObject::new();
        let props = feature.properties.as_ref().unwrap_or(&empty);

        let Some(code) = props
            .get(code_property)
            .and_then(property_string)
            .map(|s| normalize_code(&s))
            .filter(|s| !s.is_empty())
        else {
            log::warn!("Skipping feature without {code_property}");
            continue;
        };

        let name = name_properties
            .iter()
            .find_map(|p| props.get(*p).and_then(property_string))
            .unwrap_or_default();

        let mut values = BTreeMap::new();
        for column in value_columns {
            if let Some(raw) = props.get(*column) {
                present.insert((*column).to_string());
                values.insert((*column).to_string(), coerce_int(raw));
            }
        }

        let geometry = feature
            .geometry
            .and_then(|g| to_multipolygon(g, &code))
            .unwrap_or_else(|| MultiPolygon(vec![]));

        rows.push(ParsedRow {
            code,
            name,
            geometry,
            values,
        });
    }

    Ok((present, rows))
}

fn parse_comparison(csv_text: &str) -> Result<Vec<ComparisonRecord>, GeoError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut records = Vec::new();

    for row in reader.deserialize::<RawComparisonRow>() {
        let row = row?;
        let Some(code) = row
            .lsoa21cd
            .as_deref()
            .map(normalize_code)
            .filter(|s| !s.is_empty())
        else {
            continue;
        };

        let lad_code = row
            .lad24cd
            .as_deref()
            .map(normalize_code)
            .filter(|s| !s.is_empty());

        records.push(ComparisonRecord::new(
            code,
            row.lsoa21nm.filter(|s| !s.trim().is_empty()),
            lad_code,
            row.lad24nm.filter(|s| !s.trim().is_empty()),
            row.pp_dec_combined.as_deref().and_then(parse_int),
            row.imd_decile.as_deref().and_then(parse_int),
            row.ppfi_imd_diff.as_deref().and_then(parse_int),
        ));
    }

    Ok(records)
}

/// Trims and upper-cases an area code.
fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn property_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerces a property to an integer, or `None` if it is not numeric.
fn coerce_int(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_to_int)),
        serde_json::Value::String(s) => parse_int(s),
        _ => None,
    }
}

fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_int(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.round() as i64)
}

fn to_multipolygon(geometry: geojson::Geometry, code: &str) -> Option<MultiPolygon<f64>> {
    match geo::Geometry::<f64>::try_from(geometry) {
        Ok(geo::Geometry::MultiPolygon(mp)) => Some(mp),
        Ok(geo::Geometry::Polygon(p)) => Some(MultiPolygon(vec![p])),
        Ok(_) => {
            log::warn!("Feature {code} is not a polygon; drawing it empty");
            None
        }
        Err(e) => {
            log::warn!("Failed to convert geometry for {code}: {e}");
            None
        }
    }
}
