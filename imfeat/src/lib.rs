//! imfeat: image-level feature extraction for image-analysis SQLite exports
//!
//! This crate is the entrypoint for the workspace. It re-exports the loader, the extractor and
//! the table abstraction from the `imfeat-*` crates, and wires them together in
//! [`extract_from_sqlite`].
//!
//! # Quick Start
//!
//! ```no_run
//! use imfeat::extract_from_sqlite;
//!
//! let table = extract_from_sqlite(
//!     "sqlite:///plate_1.sqlite",
//!     "Per_Image",
//!     &["Image_Correlation", "Image_ImageQuality"],
//!     ["ImageNumber", "Metadata_Plate", "Metadata_Well"],
//!     ["Metadata_Plate", "Metadata_Well"],
//! )?;
//! println!("{} images x {} columns", table.num_rows(), table.num_columns());
//! # Ok::<(), imfeat::Error>(())
//! ```
//!
//! # Architecture
//!
//! - **Table** (`imfeat-table`): Arrow-backed table with unique column names.
//! - **Loader** (`imfeat-sqlite`): reads one SQLite table into a [`Table`].
//! - **Extractor** (`imfeat-extract`): selects identifier, strata and feature-category columns.
//! - **Errors** (`imfeat-result`): the shared [`Error`] enum.

pub use imfeat_extract::{
    CategorySet, ExtractOptions, Extraction, ExtractionReport, FeatureExtractor, RetainedOrder,
    extract_features, feature_columns,
};
pub use imfeat_result::{Error, Result};
pub use imfeat_sqlite::{
    ColumnSpec, DEFAULT_TABLE_NAME, SqliteReadOptions, SqliteReadSession, SqliteReader,
    load_default_table, load_table, load_table_with_options,
};
pub use imfeat_table::Table;

/// Load `table_name` from `location` and extract the requested columns from it.
///
/// Errors from the loader are returned unchanged; no extraction is attempted after a failed
/// load.
pub fn extract_from_sqlite<C, K, S>(
    location: &str,
    table_name: &str,
    categories: &[C],
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
    let table = load_table(location, table_name)?;
    tracing::debug!(
        "extracting {} categories from {} columns of '{}'",
        categories.len(),
        table.num_columns(),
        table_name
    );
    extract_features(categories, &table, keep_columns, strata)
}
