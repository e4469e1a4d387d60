//! Data Logging
//!
//! Reassembles and parses the chunked CSV logs a device uploads for a session.

mod chunks;
mod format;

pub use chunks::{reassemble, ReassembledCsv};
pub use format::{export_file_name, parse_csv, write_csv, Cell, LogTable};

use serde::{Deserialize, Serialize};

/// A single uploaded fragment of a session log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogChunk {
    /// Store key of the chunk (push id), used to break ordering ties
    #[serde(skip)]
    pub key: String,
    /// CSV text of this fragment
    #[serde(default)]
    pub csv: String,
    /// Server-assigned creation time in epoch milliseconds
    #[serde(default)]
    pub created_at: f64,
}

impl LogChunk {
    /// Create a new log chunk
    pub fn new(key: impl Into<String>, csv: impl Into<String>, created_at: f64) -> Self {
        Self {
            key: key.into(),
            csv: csv.into(),
            created_at,
        }
    }
}
