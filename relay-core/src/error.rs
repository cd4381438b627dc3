//! Error types for the review relay

use thiserror::Error;

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for relay operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Review service answered with a non-success status
    #[error("{service} API returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Review service reported an error object in its response
    #[error("{service} API error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },

    /// Review service response did not have the expected shape
    #[error("Invalid {service} API response: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },

    /// Review service returned no text
    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    /// Comment API error
    #[error("Comment API error: {0}")]
    Comments(String),

    /// No pull request to post to
    #[error("No pull request target: {0}")]
    NoTarget(String),

    /// Check-run lookup error
    #[error("Check run lookup error: {0}")]
    CheckRuns(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
