//! Error types and result definitions for the imfeat crates.
//!
//! Every crate in the workspace returns [`Result<T>`] and surfaces failures through the single
//! [`Error`] enum, so errors cross crate boundaries with `?` and callers can match on variants.
//!
//! # Error Categories
//!
//! - **Source unavailable** ([`Error::SourceUnavailable`], [`Error::TableNotFound`]): the data
//!   source cannot be opened or the requested table does not exist
//! - **Decode failures** ([`Error::DataDecode`]): a stored value cannot be represented in its
//!   Arrow column
//! - **Caller input errors** ([`Error::InvalidArgumentError`]): malformed selection parameters
//! - **Lookup failures** ([`Error::ColumnNotFound`]): explicit projection of an unknown column
//! - **Data format errors** ([`Error::Arrow`]), **I/O** ([`Error::Io`]) and
//!   **internal** errors ([`Error::Internal`])

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
