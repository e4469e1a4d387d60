//! Telemetry Store
//!
//! The external realtime database, seen only through the reads the viewer
//! and dashboard need. Paths follow the database layout:
//!
//! - `ml_sessions/<sid>`: session metadata
//! - `ml_logs/<sid>/<push-key>`: `{csv, created_at}` log chunks
//! - `live_data`: latest live record
//! - `history/<push-key>`: past live records

mod error;
mod rest;
mod snapshot;

pub use error::StoreError;
pub use rest::RestStore;
pub use snapshot::{DatabaseSnapshot, SnapshotStore};

use std::collections::BTreeMap;
use std::future::Future;

use crate::datalog::LogChunk;
use crate::live::LiveRecord;
use crate::session::SessionMeta;

/// Path of a session's metadata record
pub const SESSIONS_PATH: &str = "ml_sessions";
/// Path of the per-session log chunk collections
pub const LOGS_PATH: &str = "ml_logs";
/// Path of the live record
pub const LIVE_PATH: &str = "live_data";
/// Path of the history collection
pub const HISTORY_PATH: &str = "history";

/// Session reads used by the session viewer
pub trait TelemetryStore: Send + Sync {
    /// All log chunks of a session, in no particular order. A session without
    /// chunks yields an empty list.
    fn read_log_chunks(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<Vec<LogChunk>, StoreError>> + Send;

    /// Metadata of a session, `None` when it does not exist
    fn read_session_meta(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<Option<SessionMeta>, StoreError>> + Send;

    /// Every known session with its metadata, ordered by id
    fn list_sessions(
        &self,
    ) -> impl Future<Output = Result<Vec<(String, SessionMeta)>, StoreError>> + Send;
}

/// Live feed reads used by the dashboard
pub trait LiveFeed: Send + Sync {
    /// Latest live record
    fn read_live(&self) -> impl Future<Output = Result<Option<LiveRecord>, StoreError>> + Send;

    /// The newest `limit` history records, in no particular order
    fn read_history(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<LiveRecord>, StoreError>> + Send;
}

/// Reject ids that cannot be used as a database key
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let forbidden = |c: char| matches!(c, '.' | '$' | '#' | '[' | ']' | '/') || c.is_control();
    if key.is_empty() || key.chars().any(forbidden) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Turn a keyed chunk collection into chunks carrying their keys
pub(crate) fn keyed_chunks(collection: BTreeMap<String, LogChunk>) -> Vec<LogChunk> {
    collection
        .into_iter()
        .map(|(key, chunk)| LogChunk { key, ..chunk })
        .collect()
}

/// In-memory store, mainly for tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sessions: BTreeMap<String, SessionMeta>,
    logs: BTreeMap<String, Vec<LogChunk>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace session metadata
    pub fn insert_session(&mut self, session_id: impl Into<String>, meta: SessionMeta) {
        self.sessions.insert(session_id.into(), meta);
    }

    /// Append a log chunk to a session
    pub fn push_chunk(&mut self, session_id: impl Into<String>, chunk: LogChunk) {
        self.logs.entry(session_id.into()).or_default().push(chunk);
    }
}

impl TelemetryStore for MemoryStore {
    async fn read_log_chunks(&self, session_id: &str) -> Result<Vec<LogChunk>, StoreError> {
        validate_key(session_id)?;
        Ok(self.logs.get(session_id).cloned().unwrap_or_default())
    }

    async fn read_session_meta(&self, session_id: &str) -> Result<Option<SessionMeta>, StoreError> {
        validate_key(session_id)?;
        Ok(self.sessions.get(session_id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<(String, SessionMeta)>, StoreError> {
        Ok(self
            .sessions
            .iter()
            .map(|(sid, meta)| (sid.clone(), meta.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("20260101_120000_kettle").is_ok());
        assert!(validate_key("-NxYz").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a.b").is_err());
        assert!(matches!(validate_key("x#"), Err(StoreError::InvalidKey(k)) if k == "x#"));
    }

    #[tokio::test]
    async fn test_memory_store_reads() {
        let mut store = MemoryStore::new();
        store.insert_session("s1", SessionMeta::default());
        store.push_chunk("s1", LogChunk::new("k1", "a\n1\n", 1.0));

        assert_eq!(store.read_log_chunks("s1").await.unwrap().len(), 1);
        assert!(store.read_log_chunks("s2").await.unwrap().is_empty());
        assert!(store.read_session_meta("s2").await.unwrap().is_none());
        assert_eq!(store.list_sessions().await.unwrap().len(), 1);
    }
}
