//! Error types for the Alembic library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Alembic operations.
#[derive(Debug, Error)]
pub enum AlembicError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error writing output data.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Empty file or no data to summarize.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error (missing credentials, missing provider, bad flags).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Plan provider failure (HTTP error or unusable response body).
    #[error("Provider error: {0}")]
    Provider(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Alembic operations.
pub type Result<T> = std::result::Result<T, AlembicError>;
