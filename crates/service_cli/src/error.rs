//! CLI error types.

use adapter_loader::LoaderError;
use density_engine::{DensityError, PipelineError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Flag value rejected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Settings file or environment could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Single estimation failed
    #[error("Density estimation failed: {0}")]
    Density(#[from] DensityError),

    /// Multi-day run failed
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Quotes or news could not be loaded
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
