#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable store of the joined LSOA, LAD, and comparison tables.
//!
//! The store is built once at startup (see [`loader`]) and then only read.
//! Each areal table is paired with a `GeoJSON` feature collection whose
//! `properties.id` values match the table's row codes one-to-one; the
//! renderer hands these collections to the map frontend unchanged.

pub mod loader;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use depriv_map_geography_models::{AreaUnit, ComparisonRecord, District, IndexedRow, Table};
use geojson::{Feature, FeatureCollection, JsonObject};
use thiserror::Error;

/// Feature property holding the row code.
pub const FEATURE_ID_PROPERTY: &str = "id";

/// Errors that can occur while building the store.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading a data file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Table codes and feature ids disagree.
    #[error(
        "{layer} rows and features disagree: {missing_features} rows without a feature, \
         {orphan_features} features without a row"
    )]
    FeatureMismatch {
        /// Which table (`"lsoa"` or `"lad"`).
        layer: &'static str,
        /// Row codes with no matching feature.
        missing_features: usize,
        /// Feature ids with no matching row.
        orphan_features: usize,
    },
}

/// The loaded, immutable datasets.
#[derive(Debug)]
pub struct GeoStore {
    areas: Table<AreaUnit>,
    area_features: Arc<FeatureCollection>,
    districts: Table<District>,
    district_features: Arc<FeatureCollection>,
    comparison: Vec<ComparisonRecord>,
    district_index: BTreeMap<String, usize>,
}

impl GeoStore {
    /// Builds the store, checking that each table's codes match its
    /// feature ids exactly.
    ///
    /// The comparison table is sorted by descending absolute difference,
    /// rows without a difference last.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::FeatureMismatch`] if a table and its features
    /// disagree.
    pub fn new(
        areas: Table<AreaUnit>,
        area_features: FeatureCollection,
        districts: Table<District>,
        district_features: FeatureCollection,
        mut comparison: Vec<ComparisonRecord>,
    ) -> Result<Self, GeoError> {
        check_feature_ids("lsoa", areas.rows(), &area_features)?;
        check_feature_ids("lad", districts.rows(), &district_features)?;

        comparison.sort_by(|a, b| b.abs_diff.cmp(&a.abs_diff));

        let district_index = districts
            .rows()
            .iter()
            .enumerate()
            .map(|(i, d)| (d.code.clone(), i))
            .collect();

        log::info!(
            "Geographic store ready: {} LSOAs, {} LADs, {} comparison rows",
            areas.len(),
            districts.len(),
            comparison.len()
        );

        Ok(Self {
            areas,
            area_features: Arc::new(area_features),
            districts,
            district_features: Arc::new(district_features),
            comparison,
            district_index,
        })
    }

    /// Builds the store, deriving each feature collection from the rows'
    /// own geometries.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] under the same conditions as [`Self::new`].
    pub fn from_tables(
        areas: Table<AreaUnit>,
        districts: Table<District>,
        comparison: Vec<ComparisonRecord>,
    ) -> Result<Self, GeoError> {
        let area_features = features_for(areas.rows());
        let district_features = features_for(districts.rows());
        Self::new(
            areas,
            area_features,
            districts,
            district_features,
            comparison,
        )
    }

    /// Full, unfiltered LSOA table.
    #[must_use]
    pub const fn areas(&self) -> &Table<AreaUnit> {
        &self.areas
    }

    /// LSOA boundaries keyed by `properties.id`.
    #[must_use]
    pub fn area_features(&self) -> Arc<FeatureCollection> {
        Arc::clone(&self.area_features)
    }

    /// Full, unfiltered LAD table.
    #[must_use]
    pub const fn districts(&self) -> &Table<District> {
        &self.districts
    }

    /// LAD boundaries keyed by `properties.id`.
    #[must_use]
    pub fn district_features(&self) -> Arc<FeatureCollection> {
        Arc::clone(&self.district_features)
    }

    /// Total number of LADs in the full table.
    #[must_use]
    pub fn district_count(&self) -> usize {
        self.districts.len()
    }

    /// Looks up a LAD by code.
    #[must_use]
    pub fn district(&self, code: &str) -> Option<&District> {
        self.district_index
            .get(code)
            .map(|&i| &self.districts.rows()[i])
    }

    /// Comparison rows, largest absolute difference first.
    #[must_use]
    pub fn comparison(&self) -> &[ComparisonRecord] {
        &self.comparison
    }
}

/// Builds a feature collection with one feature per row, carrying only the
/// row's geometry and its code as `properties.id`.
#[must_use]
pub fn features_for<R: IndexedRow>(rows: &[R]) -> FeatureCollection {
    let features = rows
        .iter()
        .map(|row| {
            let mut properties = JsonObject::new();
            properties.insert(
                FEATURE_ID_PROPERTY.to_string(),
                serde_json::Value::String(row.code().to_string()),
            );
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(
                    row.geometry(),
                ))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Returns the `properties.id` of a feature, if it is a string.
#[must_use]
pub fn feature_id(feature: &Feature) -> Option<&str> {
    feature
        .properties
        .as_ref()?
        .get(FEATURE_ID_PROPERTY)?
        .as_str()
}

fn check_feature_ids<R: IndexedRow>(
    layer: &'static str,
    rows: &[R],
    features: &FeatureCollection,
) -> Result<(), GeoError> {
    let codes: BTreeSet<&str> = rows.iter().map(IndexedRow::code).collect();
    let ids: BTreeSet<&str> = features.features.iter().filter_map(feature_id).collect();

    if codes.len() != rows.len() {
        log::warn!(
            "{layer} table has {} duplicate codes",
            rows.len() - codes.len()
        );
    }

    let missing_features = codes.difference(&ids).count();
    let orphan_features = ids.difference(&codes).count();

    if missing_features > 0 || orphan_features > 0 {
        return Err(GeoError::FeatureMismatch {
            layer,
            missing_features,
            orphan_features,
        });
    }

    Ok(())
}
