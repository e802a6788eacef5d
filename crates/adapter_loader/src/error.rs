//! Adapter error types.

use density_engine::SourceError;
use thiserror::Error;

/// Errors raised while loading quotes or news.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing or decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON syntax or shape error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field held a value that could not be interpreted.
    #[error("Parse error at record {record}: {message}")]
    Parse {
        /// 1-based record number
        record: usize,
        /// What went wrong
        message: String,
    },

    /// Generator settings out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<LoaderError> for SourceError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::Parse { record, message } => SourceError::Parse { record, message },
            other => SourceError::Io(other.to_string()),
        }
    }
}
