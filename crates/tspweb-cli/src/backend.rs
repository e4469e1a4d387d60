//! Store selection for commands

use std::path::Path;

use anyhow::{Context, Result};

use tspweb_core::config::ViewerConfig;
use tspweb_core::datalog::LogChunk;
use tspweb_core::live::LiveRecord;
use tspweb_core::session::SessionMeta;
use tspweb_core::store::{LiveFeed, RestStore, SnapshotStore, StoreError, TelemetryStore};

/// The store a command reads from
pub enum Backend {
    Snapshot(SnapshotStore),
    Rest(RestStore),
}

impl Backend {
    /// A snapshot file if one was given, else the configured database
    pub fn open(snapshot: Option<&Path>, config: &ViewerConfig) -> Result<Self> {
        if let Some(path) = snapshot {
            let store = SnapshotStore::open(path)
                .with_context(|| format!("Failed to open snapshot {}", path.display()))?;
            return Ok(Backend::Snapshot(store));
        }
        let store = RestStore::from_config(config)
            .context("Pass --snapshot or --database-url (or set TSPWEB_DATABASE_URL)")?;
        tracing::info!(url = store.base_url(), "using realtime database");
        Ok(Backend::Rest(store))
    }
}

impl TelemetryStore for Backend {
    async fn read_log_chunks(&self, session_id: &str) -> Result<Vec<LogChunk>, StoreError> {
        match self {
            Backend::Snapshot(s) => s.read_log_chunks(session_id).await,
            Backend::Rest(s) => s.read_log_chunks(session_id).await,
        }
    }

    async fn read_session_meta(&self, session_id: &str) -> Result<Option<SessionMeta>, StoreError> {
        match self {
            Backend::Snapshot(s) => s.read_session_meta(session_id).await,
            Backend::Rest(s) => s.read_session_meta(session_id).await,
        }
    }

    async fn list_sessions(&self) -> Result<Vec<(String, SessionMeta)>, StoreError> {
        match self {
            Backend::Snapshot(s) => s.list_sessions().await,
            Backend::Rest(s) => s.list_sessions().await,
        }
    }
}

impl LiveFeed for Backend {
    async fn read_live(&self) -> Result<Option<LiveRecord>, StoreError> {
        match self {
            Backend::Snapshot(s) => s.read_live().await,
            Backend::Rest(s) => s.read_live().await,
        }
    }

    async fn read_history(&self, limit: usize) -> Result<Vec<LiveRecord>, StoreError> {
        match self {
            Backend::Snapshot(s) => s.read_history(limit).await,
            Backend::Rest(s) => s.read_history(limit).await,
        }
    }
}
