//! Store errors

use thiserror::Error;

/// Errors that can occur while reading from or writing to a telemetry store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Request for '{path}' failed with status {status}")]
    Status {
        /// Database path that was requested
        path: String,
        /// HTTP status code
        status: u16,
    },

    /// File access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Key contains characters the database forbids
    #[error("Invalid key '{0}'")]
    InvalidKey(String),

    /// No database URL configured
    #[error("No database URL configured")]
    NotConfigured,
}
