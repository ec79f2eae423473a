use std::{fmt, io};
use thiserror::Error;

/// Unified error type for all imfeat operations.
///
/// Errors propagate upward with `?`. Neither the loader nor the extractor catches or masks
/// errors raised by the other, so the first failure reaches the caller unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// The data source could not be opened.
    ///
    /// Raised by the loader when the location does not exist, is not a readable database, or
    /// names a source that can never hold a table (such as an in-memory database). Not
    /// recoverable locally; retrying transient failures is the caller's responsibility.
    #[error("data source '{location}' is unavailable: {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// The data source opened, but the named table does not exist in it.
    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    /// A stored value cannot be represented in the Arrow type chosen for its column.
    ///
    /// `row` is the zero-based position of the offending row within the table scan.
    #[error("cannot decode {table}.{column} at row {row}: {reason}")]
    DataDecode {
        table: String,
        column: String,
        row: usize,
        reason: String,
    },

    /// Invalid caller input.
    ///
    /// Covers strict-mode category checks, repeated selection names, and tables
    /// that violate the unique-column-name invariant.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// A column was requested by name and is absent from the table.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Arrow library error while assembling or concatenating batches.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// I/O error while inspecting the source location.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Build a [`Error::SourceUnavailable`] from any displayable cause.
    ///
    /// ```
    /// use imfeat_result::Error;
    ///
    /// let err = Error::source_unavailable("cells.sqlite", "unable to open database file");
    /// assert!(err.is_not_found());
    /// assert!(err.to_string().contains("cells.sqlite"));
    /// ```
    #[inline]
    pub fn source_unavailable<E: fmt::Display>(location: impl Into<String>, reason: E) -> Self {
        Error::SourceUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    #[inline]
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Error::TableNotFound {
            table: table.into(),
        }
    }

    /// Build a [`Error::DataDecode`] for a single cell.
    #[inline]
    pub fn data_decode<E: fmt::Display>(
        table: impl Into<String>,
        column: impl Into<String>,
        row: usize,
        reason: E,
    ) -> Self {
        Error::DataDecode {
            table: table.into(),
            column: column.into(),
            row,
            reason: reason.to_string(),
        }
    }

    /// True for every member of the not-found family: unavailable sources, missing tables and
    /// missing columns.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::SourceUnavailable { .. } | Error::TableNotFound { .. } | Error::ColumnNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_family() {
        assert!(Error::table_not_found("Per_Image").is_not_found());
        assert!(Error::ColumnNotFound("ImageNumber".into()).is_not_found());
        assert!(!Error::InvalidArgumentError("repeated column".into()).is_not_found());
        assert!(!Error::data_decode("Per_Image", "ImageNumber", 3, "text").is_not_found());
    }

    #[test]
    fn decode_message_names_the_cell() {
        let err = Error::data_decode("Per_Image", "Image_Count_Cells", 7, "expected integer");
        assert_eq!(
            err.to_string(),
            "cannot decode Per_Image.Image_Count_Cells at row 7: expected integer"
        );
    }
}
