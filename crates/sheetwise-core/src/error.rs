//! Error types for sheetwise-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing references
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Column letters encode a column beyond the addressable space
    #[error("Column out of range: {0}")]
    ColumnOutOfRange(String),

    /// Row number is zero or beyond the addressable space
    #[error("Row out of range: {0}")]
    RowOutOfRange(String),
}
