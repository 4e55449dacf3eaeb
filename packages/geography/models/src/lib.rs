#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Areal unit, district, and comparison record types.
//!
//! LSOA rows ([`AreaUnit`]) carry decile values, LAD rows ([`District`])
//! carry rank values, and [`ComparisonRecord`] rows pair the two combined
//! LSOA deciles. Value columns are dynamic: each row maps a column
//! identifier from the domain registry to an optional integer, and each
//! [`Table`] records which columns its source data actually provided.

use std::collections::{BTreeMap, BTreeSet};

use geo::{BoundingRect, MultiPolygon};
use serde::{Deserialize, Serialize};

/// Column name recorded on the LSOA table once LSOAs have been joined to
/// their parent LAD.
pub const PARENT_CODE_COLUMN: &str = "lad_cd";

/// Geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Bounding box of a polygon set, or `None` if it has no coordinates.
    #[must_use]
    pub fn of(geometry: &MultiPolygon<f64>) -> Option<Self> {
        geometry
            .bounding_rect()
            .map(|rect| Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// East-west extent in degrees.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// North-south extent in degrees.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Midpoint as `(lon, lat)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.west, self.east),
            f64::midpoint(self.south, self.north),
        )
    }
}

/// A row that carries a code, a name, a geometry, and index values.
pub trait IndexedRow {
    /// Unique, normalized code (matches the geometry feature id).
    fn code(&self) -> &str;

    /// Display name (empty if the source had none).
    fn name(&self) -> &str;

    /// Value of `column`, or `None` if the column is absent or null.
    fn value(&self, column: &str) -> Option<i64>;

    /// Polygon geometry in WGS84.
    fn geometry(&self) -> &MultiPolygon<f64>;

    /// Bounding box of [`Self::geometry`].
    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of(self.geometry())
    }
}

/// A fine-grained areal unit (LSOA).
#[derive(Debug, Clone, PartialEq)]
pub struct AreaUnit {
    /// LSOA code (e.g. `"E01000001"`).
    pub code: String,
    /// LSOA name.
    pub name: String,
    /// Parent LAD code, if the join found one.
    pub district_code: Option<String>,
    /// Boundary polygons.
    pub geometry: MultiPolygon<f64>,
    /// Decile values keyed by column identifier.
    pub values: BTreeMap<String, Option<i64>>,
}

impl IndexedRow for AreaUnit {
    fn code(&self) -> &str {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, column: &str) -> Option<i64> {
        self.values.get(column).copied().flatten()
    }

    fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }
}

/// A coarse-grained administrative district (LAD).
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    /// LAD code (e.g. `"E07000001"`).
    pub code: String,
    /// LAD name.
    pub name: String,
    /// Boundary polygons.
    pub geometry: MultiPolygon<f64>,
    /// Rank values keyed by column identifier (1 = most deprived).
    pub values: BTreeMap<String, Option<i64>>,
}

impl IndexedRow for District {
    fn code(&self) -> &str {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, column: &str) -> Option<i64> {
        self.values.get(column).copied().flatten()
    }

    fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }
}

/// One LSOA's combined deciles from both indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    /// LSOA code.
    pub lsoa_code: String,
    /// LSOA name.
    pub lsoa_name: Option<String>,
    /// Parent LAD code.
    pub lad_code: Option<String>,
    /// Parent LAD name.
    pub lad_name: Option<String>,
    /// Combined PPFI decile.
    pub ppfi_decile: Option<i64>,
    /// Combined IMD decile.
    pub imd_decile: Option<i64>,
    /// PPFI decile minus IMD decile.
    pub diff: Option<i64>,
    /// Absolute value of [`Self::diff`].
    pub abs_diff: Option<i64>,
}

impl ComparisonRecord {
    /// Creates a record, deriving `diff` from the deciles when not given
    /// and `abs_diff` from `diff`.
    #[must_use]
    pub fn new(
        lsoa_code: String,
        lsoa_name: Option<String>,
        lad_code: Option<String>,
        lad_name: Option<String>,
        ppfi_decile: Option<i64>,
        imd_decile: Option<i64>,
        diff: Option<i64>,
    ) -> Self {
        let diff = diff.or_else(|| Some(ppfi_decile? - imd_decile?));

        Self {
            lsoa_code,
            lsoa_name,
            lad_code,
            lad_name,
            ppfi_decile,
            imd_decile,
            diff,
            abs_diff: diff.map(i64::abs),
        }
    }
}

/// Immutable rows plus the set of value columns the source provided.
#[derive(Debug, Clone)]
pub struct Table<R> {
    columns: BTreeSet<String>,
    rows: Vec<R>,
}

impl<R> Table<R> {
    /// Creates a table.
    #[must_use]
    pub const fn new(columns: BTreeSet<String>, rows: Vec<R>) -> Self {
        Self { columns, rows }
    }

    /// Value columns present in the source.
    #[must_use]
    pub const fn columns(&self) -> &BTreeSet<String> {
        &self.columns
    }

    /// Returns `true` if the source provided `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// All rows, in load order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A view over every row.
    #[must_use]
    pub fn view(&self) -> TableView<'_, R> {
        TableView {
            columns: &self.columns,
            rows: self.rows.iter().collect(),
        }
    }
}

/// A borrowed subset of a [`Table`]'s rows.
///
/// Filtering produces new views; the underlying rows are never copied or
/// mutated.
#[derive(Debug)]
pub struct TableView<'a, R> {
    columns: &'a BTreeSet<String>,
    rows: Vec<&'a R>,
}

impl<R> Clone for TableView<'_, R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns,
            rows: self.rows.clone(),
        }
    }
}

impl<'a, R> TableView<'a, R> {
    /// Returns `true` if the underlying table has `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Rows in this view, in table order.
    #[must_use]
    pub fn rows(&self) -> &[&'a R] {
        &self.rows
    }

    /// Iterates the rows in this view.
    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.rows.iter().copied()
    }

    /// Number of rows in this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the view has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new view keeping only rows matching `predicate`.
    #[must_use]
    pub fn retain(&self, mut predicate: impl FnMut(&R) -> bool) -> Self {
        Self {
            columns: self.columns,
            rows: self.rows.iter().copied().filter(|r| predicate(*r)).collect(),
        }
    }
}

impl<R: IndexedRow> TableView<'_, R> {
    /// Largest non-null value of `column` in this view.
    #[must_use]
    pub fn max(&self, column: &str) -> Option<i64> {
        self.iter().filter_map(|r| r.value(column)).max()
    }

    /// Union of the bounding boxes of every row in this view.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.iter()
            .filter_map(IndexedRow::bounding_box)
            .reduce(BoundingBox::union)
    }
}
