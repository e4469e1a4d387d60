//! Session load errors

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while opening a session
#[derive(Error, Debug)]
pub enum LoadError {
    /// No session id given
    #[error("Missing sid (open from the Sessions table).")]
    NoSessionSelected,

    /// No metadata for the session
    #[error("Session '{0}' not found")]
    SessionNotFound(String),

    /// The session has no data rows
    #[error("No CSV chunks found for session '{0}'")]
    EmptyDataset(String),

    /// The store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The reassembled log is not valid CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    /// No session id, or no metadata for it
    pub fn is_missing_session(&self) -> bool {
        matches!(
            self,
            LoadError::NoSessionSelected | LoadError::SessionNotFound(_)
        )
    }
}
