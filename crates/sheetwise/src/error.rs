//! Error types for the sheetwise umbrella crate

use thiserror::Error;

/// Result type for sheet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while editing or loading a sheet
#[derive(Debug, Error)]
pub enum Error {
    /// Bad cell reference
    #[error("{0}")]
    Core(#[from] sheetwise_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Grid larger than the addressable rows or columns
    #[error("CSV grid too large: {0}")]
    GridTooLarge(String),
}
