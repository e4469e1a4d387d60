//! Session loading
//!
//! Fetch metadata and chunks, reassemble, and open a viewer. Fetches are
//! never cancelled; instead a result that arrives for a session other than
//! the one currently selected is discarded.

use std::future::Future;
use std::sync::Arc;

use super::{LoadError, SessionViewer};
use crate::config::ViewerConfig;
use crate::datalog::reassemble;
use crate::store::TelemetryStore;

/// Proof that a session was selected; redeemed by [`SessionLoader::fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    session_id: String,
}

impl LoadTicket {
    /// Selected session
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// A finished fetch, not yet checked for staleness
#[derive(Debug)]
pub struct LoadResult {
    /// Session the fetch was for
    pub session_id: String,
    /// Loaded viewer or the failure
    pub outcome: Result<SessionViewer, LoadError>,
}

/// Load a session from a store: metadata, then chunks, then the model.
pub async fn load_session<S: TelemetryStore>(
    store: &S,
    session_id: &str,
    config: &ViewerConfig,
) -> Result<SessionViewer, LoadError> {
    let meta = store
        .read_session_meta(session_id)
        .await?
        .ok_or_else(|| LoadError::SessionNotFound(session_id.to_string()))?;

    tracing::info!(session = session_id, "fetching CSV chunks");
    let chunks = store.read_log_chunks(session_id).await?;

    let csv = reassemble(&chunks).ok_or_else(|| LoadError::EmptyDataset(session_id.to_string()))?;

    tracing::info!(session = session_id, rows = csv.row_count(), "parsing CSV");
    SessionViewer::new(session_id, meta, csv, config)
}

/// Tracks the selected session and filters out stale load results
pub struct SessionLoader<S> {
    store: Arc<S>,
    config: Arc<ViewerConfig>,
    selected: Option<String>,
}

impl<S: TelemetryStore + 'static> SessionLoader<S> {
    /// Create a loader over a store
    pub fn new(store: S, config: ViewerConfig) -> Self {
        Self::with_shared(Arc::new(store), Arc::new(config))
    }

    /// Create a loader over an already shared store and config
    pub fn with_shared(store: Arc<S>, config: Arc<ViewerConfig>) -> Self {
        Self {
            store,
            config,
            selected: None,
        }
    }

    /// The store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Currently selected session
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a session (e.g. from a `sid` query parameter). A missing or
    /// blank id clears the selection and fails with
    /// [`LoadError::NoSessionSelected`].
    pub fn select(&mut self, session_id: Option<&str>) -> Result<LoadTicket, LoadError> {
        match session_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(sid) => {
                self.selected = Some(sid.to_string());
                Ok(LoadTicket {
                    session_id: sid.to_string(),
                })
            }
            None => {
                self.selected = None;
                Err(LoadError::NoSessionSelected)
            }
        }
    }

    /// Start fetching a selected session. The returned future owns what it
    /// needs, so it can be spawned or held while another session is selected.
    pub fn fetch(&self, ticket: LoadTicket) -> impl Future<Output = LoadResult> + Send + 'static {
        let store = Arc::clone(&self.store);
        let config = Arc::clone(&self.config);
        async move {
            let outcome = load_session(store.as_ref(), &ticket.session_id, &config).await;
            LoadResult {
                session_id: ticket.session_id,
                outcome,
            }
        }
    }

    /// Accept a finished fetch. Returns `None` when the result belongs to a
    /// session that is no longer selected.
    pub fn accept(&self, result: LoadResult) -> Option<Result<SessionViewer, LoadError>> {
        if self.selected.as_deref() != Some(result.session_id.as_str()) {
            tracing::debug!(session = %result.session_id, "discarding stale load result");
            return None;
        }
        Some(result.outcome)
    }

    /// Select and load a session in one step
    pub async fn load(&mut self, session_id: Option<&str>) -> Result<SessionViewer, LoadError> {
        let ticket = self.select(session_id)?;
        self.fetch(ticket).await.outcome
    }
}
