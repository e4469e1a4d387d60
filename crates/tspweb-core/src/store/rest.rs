//! Realtime database REST client
//!
//! Every node of the database is readable as `<base>/<path>.json`. A node
//! that does not exist reads as JSON `null`.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::{
    keyed_chunks, validate_key, LiveFeed, StoreError, TelemetryStore, HISTORY_PATH, LIVE_PATH,
    LOGS_PATH, SESSIONS_PATH,
};
use crate::config::ViewerConfig;
use crate::datalog::LogChunk;
use crate::live::LiveRecord;
use crate::session::SessionMeta;

/// Read-only client for the realtime database
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    auth: Option<String>,
}

impl RestStore {
    /// Create a client for a database URL such as
    /// `https://project-default-rtdb.firebaseio.com`
    pub fn new(base_url: impl Into<String>, auth: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tspweb/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        RestStore {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: auth.filter(|a| !a.is_empty()),
        }
    }

    /// Create a client from the viewer configuration
    pub fn from_config(config: &ViewerConfig) -> Result<Self, StoreError> {
        match config.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(Self::new(url, config.auth_token.clone())),
            _ => Err(StoreError::NotConfigured),
        }
    }

    /// Database URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, StoreError> {
        let mut request = self.client.get(self.url(path)).query(query);
        if let Some(auth) = &self.auth {
            request = request.query(&[("auth", auth.as_str())]);
        }

        tracing::debug!(path, "GET");
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status {
                path: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }
}

impl TelemetryStore for RestStore {
    async fn read_log_chunks(&self, session_id: &str) -> Result<Vec<LogChunk>, StoreError> {
        validate_key(session_id)?;
        let path = format!("{LOGS_PATH}/{session_id}");
        let collection: Option<BTreeMap<String, LogChunk>> = self.get_json(&path, &[]).await?;
        Ok(collection.map(keyed_chunks).unwrap_or_default())
    }

    async fn read_session_meta(&self, session_id: &str) -> Result<Option<SessionMeta>, StoreError> {
        validate_key(session_id)?;
        self.get_json(&format!("{SESSIONS_PATH}/{session_id}"), &[])
            .await
    }

    async fn list_sessions(&self) -> Result<Vec<(String, SessionMeta)>, StoreError> {
        let sessions: Option<BTreeMap<String, SessionMeta>> =
            self.get_json(SESSIONS_PATH, &[]).await?;
        Ok(sessions.unwrap_or_default().into_iter().collect())
    }
}

impl LiveFeed for RestStore {
    async fn read_live(&self) -> Result<Option<LiveRecord>, StoreError> {
        self.get_json(LIVE_PATH, &[]).await
    }

    async fn read_history(&self, limit: usize) -> Result<Vec<LiveRecord>, StoreError> {
        let query = [
            ("orderBy", "\"server_ts\"".to_string()),
            ("limitToLast", limit.to_string()),
        ];
        let history: Option<BTreeMap<String, LiveRecord>> =
            self.get_json(HISTORY_PATH, &query).await?;
        Ok(history.unwrap_or_default().into_values().collect())
    }
}
