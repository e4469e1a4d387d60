//! Offline database snapshots
//!
//! A JSON export of the realtime database, read from disk. Lets sessions be
//! inspected and replayed without network access.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{keyed_chunks, validate_key, LiveFeed, StoreError, TelemetryStore};
use crate::datalog::LogChunk;
use crate::live::LiveRecord;
use crate::session::SessionMeta;

/// The parts of a database export the viewer reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSnapshot {
    /// Session metadata by session id
    pub ml_sessions: BTreeMap<String, SessionMeta>,
    /// Log chunks by session id, then push key
    pub ml_logs: BTreeMap<String, BTreeMap<String, LogChunk>>,
    /// Latest live reading
    pub live_data: Option<LiveRecord>,
    /// History records by push key
    pub history: BTreeMap<String, LiveRecord>,
}

impl DatabaseSnapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a snapshot file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the snapshot as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Store backed by a [`DatabaseSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshot: DatabaseSnapshot,
}

impl SnapshotStore {
    /// Wrap a snapshot
    pub fn new(snapshot: DatabaseSnapshot) -> Self {
        Self { snapshot }
    }

    /// Open a snapshot file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let snapshot = DatabaseSnapshot::load(path)?;
        tracing::info!(
            path = %path.display(),
            sessions = snapshot.ml_sessions.len(),
            "snapshot loaded"
        );
        Ok(Self::new(snapshot))
    }

    /// The underlying snapshot
    pub fn snapshot(&self) -> &DatabaseSnapshot {
        &self.snapshot
    }
}

impl TelemetryStore for SnapshotStore {
    async fn read_log_chunks(&self, session_id: &str) -> Result<Vec<LogChunk>, StoreError> {
        validate_key(session_id)?;
        Ok(self
            .snapshot
            .ml_logs
            .get(session_id)
            .cloned()
            .map(keyed_chunks)
            .unwrap_or_default())
    }

    async fn read_session_meta(&self, session_id: &str) -> Result<Option<SessionMeta>, StoreError> {
        validate_key(session_id)?;
        Ok(self.snapshot.ml_sessions.get(session_id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<(String, SessionMeta)>, StoreError> {
        Ok(self
            .snapshot
            .ml_sessions
            .iter()
            .map(|(sid, meta)| (sid.clone(), meta.clone()))
            .collect())
    }
}

impl LiveFeed for SnapshotStore {
    async fn read_live(&self) -> Result<Option<LiveRecord>, StoreError> {
        Ok(self.snapshot.live_data.clone())
    }

    async fn read_history(&self, limit: usize) -> Result<Vec<LiveRecord>, StoreError> {
        let mut records: Vec<LiveRecord> = self.snapshot.history.values().cloned().collect();
        records.sort_by(|a, b| a.server_ts.total_cmp(&b.server_ts));
        let skip = records.len().saturating_sub(limit);
        Ok(records.split_off(skip))
    }
}
