#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Alignment classification, summary statistics, and mismatch tables.
//!
//! Everything here is a pure function of the immutable comparison and
//! areal tables; callers recompute on every request.

pub mod alignment;
pub mod mismatch;
pub mod stats;

pub use alignment::{AlignmentThresholds, classify};
pub use mismatch::{MISMATCH_COLUMNS, district_names, mismatch_rows};
pub use stats::{summarize, summary_lines};
