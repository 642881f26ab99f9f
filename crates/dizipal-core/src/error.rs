//! Error types for the Dizipal crawler
//!
//! Only unrecoverable conditions surface as errors. Missing markup, empty
//! pages and failed listing pages are reported through `FetchOutcome`,
//! `Option` and empty vectors instead.

use thiserror::Error;

/// Error type for Dizipal crawler operations
#[derive(Error, Debug)]
pub enum DizipalError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse a document
    #[error("Failed to parse document: {0}")]
    ParseError(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Requested resource was not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// No URL source produced anything, so there is nothing to emit
    #[error("No content source available: {0}")]
    NoSource(String),
}

impl From<url::ParseError> for DizipalError {
    fn from(err: url::ParseError) -> Self {
        DizipalError::InvalidUrl(err.to_string())
    }
}

/// Result type alias for Dizipal crawler operations
pub type Result<T> = std::result::Result<T, DizipalError>;
