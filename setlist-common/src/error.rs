//! Common error types for the setlist crates

use thiserror::Error;

/// Common result type for setlist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the setlist crates
#[derive(Error, Debug)]
pub enum Error {
    /// Add or rename onto a title that already exists in the song store
    #[error("Song already exists: {0}")]
    DuplicateTitle(String),

    /// Operation referenced a title absent from the relevant store
    #[error("Song not found: {0}")]
    NotFound(String),

    /// Malformed request body or import document
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Underlying key-value store operation failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
