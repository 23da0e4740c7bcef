//! Error types for the completion service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GptError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    #[error("Request {0} was dropped before it completed")]
    Abandoned(String),
}

pub type Result<T> = std::result::Result<T, GptError>;
