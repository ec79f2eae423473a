//! Feature extraction over per-image measurement tables.
//!
//! Given a table, a list of category prefixes, and the identifier ("keep") and strata columns a
//! caller needs to trace rows back to their source image, [`extract_features`] returns a new
//! table laid out as:
//!
//! 1. the retained columns, `(keep ∪ strata) ∩ columns(table)`, sorted by name;
//! 2. every column whose name starts with at least one category prefix, in source order.
//!
//! A column reachable both ways appears once, in the retained block. Requested keep or strata
//! names that the table lacks are skipped rather than reported as errors, since identifier sets
//! are often shared across datasets whose schemas differ slightly. Categories that match
//! nothing simply contribute no columns.
//!
//! ```
//! use imfeat_extract::extract_features;
//! # use std::sync::Arc;
//! # use arrow::array::{ArrayRef, Float64Array, Int64Array};
//! # use imfeat_table::Table;
//! # let col = |v: Vec<f64>| Arc::new(Float64Array::from(v)) as ArrayRef;
//! # let table = Table::from_arrays(vec![
//! #     ("ImageNumber", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
//! #     ("Image_Correlation_A", col(vec![0.1, 0.2])),
//! #     ("Image_ImageQuality_X", col(vec![1.0, 2.0])),
//! # ]).unwrap();
//!
//! let out = extract_features(&["Image_Correlation"], &table, ["ImageNumber"], ["ImageNumber"])?;
//! assert_eq!(out.column_names(), vec!["ImageNumber", "Image_Correlation_A"]);
//! # Ok::<(), imfeat_result::Error>(())
//! ```
//!
//! [`FeatureExtractor`] exposes the same operation with [`ExtractOptions`] and returns an
//! [`ExtractionReport`] alongside the table.

use imfeat_result::Result;
use imfeat_table::Table;

pub mod extractor;
pub mod options;
pub mod selection;

pub use extractor::{Extraction, ExtractionReport, FeatureExtractor, feature_columns};
pub use options::{ExtractOptions, RetainedOrder};
pub use selection::CategorySet;

/// Extract retained and feature-category columns from `table` with default options.
///
/// An empty category prefix matches every column, so `&[""]` yields the retained block followed
/// by every other column in source order.
pub fn extract_features<C, K, S>(
    categories: &[C],
    table: &Table,
    keep_columns: K,
    strata: S,
) -> Result<Table>
where
    C: AsRef<str>,
    K: IntoIterator,
    K::Item: AsRef<str>,
    S: IntoIterator,
    S::Item: AsRef<str>,
{
    FeatureExtractor::default()
        .extract(categories, table, keep_columns, strata)
        .map(|extraction| extraction.table)
}
