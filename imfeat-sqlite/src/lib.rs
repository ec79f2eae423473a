//! Table loader for SQLite exports of an image-analysis pipeline.
//!
//! The loader is a read-only I/O adapter: it opens a database file (a plain path or an
//! SQLAlchemy-style `sqlite:///path` URL), resolves an Arrow type for every column of the
//! requested table, and materialises all rows into an [`imfeat_table::Table`] whose columns are
//! exactly the table's columns in declaration order.
//!
//! ```no_run
//! let table = imfeat_sqlite::load_table("sqlite:///plate_1.sqlite", "Per_Image")?;
//! println!("{} images", table.num_rows());
//! # Ok::<(), imfeat_result::Error>(())
//! ```

use imfeat_result::Result;
use imfeat_table::Table;

mod decode;
pub mod inference;
pub mod reader;
mod source;

pub use inference::ColumnSpec;
pub use reader::{DEFAULT_TABLE_NAME, SqliteReadOptions, SqliteReadSession, SqliteReader};

/// Load `table_name` from the source at `location`.
///
/// Fails with [`Error::SourceUnavailable`](imfeat_result::Error::SourceUnavailable) when the
/// source cannot be opened, [`Error::TableNotFound`](imfeat_result::Error::TableNotFound) when
/// the table is missing, and [`Error::DataDecode`](imfeat_result::Error::DataDecode) when a
/// stored value does not fit its column's type.
pub fn load_table(location: &str, table_name: &str) -> Result<Table> {
    load_table_with_options(location, &SqliteReadOptions::for_table(table_name))
}

/// Load the [`DEFAULT_TABLE_NAME`] table.
pub fn load_default_table(location: &str) -> Result<Table> {
    load_table_with_options(location, &SqliteReadOptions::default())
}

pub fn load_table_with_options(location: &str, options: &SqliteReadOptions) -> Result<Table> {
    SqliteReader::new(options.clone()).open(location)?.into_table()
}
