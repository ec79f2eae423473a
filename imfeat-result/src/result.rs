use crate::error::Error;

/// Result type alias used throughout imfeat.
pub type Result<T> = std::result::Result<T, Error>;
