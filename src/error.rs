//! Error types for character_finder

use thiserror::Error;

/// Unified error type for character_finder operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse or serialize JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Cache file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// HTTP error status code without a Scryfall error body
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Scryfall returned an error object
    #[error("{code}: {details}")]
    ApiResponse { code: String, details: String },
}

/// Result alias for character_finder operations
pub type Result<T> = std::result::Result<T, Error>;
