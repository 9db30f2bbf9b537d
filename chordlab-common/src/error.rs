//! Common error types for ChordLab

use thiserror::Error;

/// Common result type for ChordLab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across ChordLab crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Song record rejected before touching the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bulk replace/export failed part-way; carries the underlying cause
    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    /// Wrap any failure from the replace-all sequence as an export error
    pub fn export(cause: impl Into<Error>) -> Self {
        match cause.into() {
            e @ Error::Export(_) => e,
            other => Error::Export(other.to_string()),
        }
    }
}
