//! Error types for Genebra Core

use thiserror::Error;

/// Result type alias using Genebra Error
pub type Result<T> = std::result::Result<T, Error>;

/// Genebra error types
#[derive(Error, Debug)]
pub enum Error {
    /// The login endpoint answered with a non-success status.
    /// Carries the server message (or the generic fallback) verbatim.
    #[error("{0}")]
    AuthRejected(String),

    #[error("Not authenticated: no stored token")]
    NotAuthenticated,

    #[error("API Error: {status} - {message}")]
    CompletionApi { status: u16, message: String },

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to read attachment: {0}")]
    Encoding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs can carry the completion API key as a query parameter
        let e = e.without_url();
        if e.is_decode() {
            Error::Http(format!("Failed to parse response: {}", e))
        } else {
            Error::Http(e.to_string())
        }
    }
}
