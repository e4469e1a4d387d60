//! Device status and the stalled-feed watchdog

use std::fmt;

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::LiveRecord;
use crate::config::ViewerConfig;
use crate::display::{format_epoch_ms_in, DASH};

/// Coarse device status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Normal operation
    Ok,
    /// Overload or overheating
    Warning,
    /// Arc fault detected
    Arcing,
    /// No fresh data or device offline
    Disconnected,
}

impl StatusKind {
    /// Classify a free-form status label for the status badge
    pub fn classify(label: &str) -> Self {
        let label = label.to_uppercase();
        if label.contains("DISCON") {
            StatusKind::Disconnected
        } else if label.contains("ARC") {
            StatusKind::Arcing
        } else if ["OVERLOAD", "WARN", "HEAT", "TEMP"]
            .iter()
            .any(|k| label.contains(k))
        {
            StatusKind::Warning
        } else {
            StatusKind::Ok
        }
    }

    /// Classify a history record's label. Arcing wins over a disconnect here,
    /// and any `OVER` counts as a warning.
    pub fn classify_history(label: &str) -> Self {
        let label = label.to_uppercase();
        if label.contains("ARC") {
            StatusKind::Arcing
        } else if label.contains("DISCON") {
            StatusKind::Disconnected
        } else if label.contains("WARN") || label.contains("OVER") {
            StatusKind::Warning
        } else {
            StatusKind::Ok
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusKind::Ok => "OK",
            StatusKind::Warning => "WARN",
            StatusKind::Arcing => "ARCING",
            StatusKind::Disconnected => "DISCONNECTED",
        };
        f.write_str(name)
    }
}

/// Tracks the live feed and decides when the device counts as disconnected
#[derive(Debug, Clone)]
pub struct LiveMonitor {
    stale_after_ms: i64,
    last_seen_ms: Option<i64>,
    last_epoch_ms: f64,
    last_iso: Option<String>,
    label: String,
    kind: StatusKind,
    latest: Option<LiveRecord>,
}

impl LiveMonitor {
    /// Create a monitor that reports a disconnect after `stale_after_ms`
    /// without updates
    pub fn new(stale_after_ms: u64) -> Self {
        Self {
            stale_after_ms: i64::try_from(stale_after_ms).unwrap_or(i64::MAX),
            last_seen_ms: None,
            last_epoch_ms: 0.0,
            last_iso: None,
            label: StatusKind::Disconnected.to_string(),
            kind: StatusKind::Disconnected,
            latest: None,
        }
    }

    /// Create a monitor with the configured staleness limit
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.stale_after_ms)
    }

    /// Record a live update received at `now_ms`
    pub fn on_live(&mut self, record: LiveRecord, now_ms: i64) {
        self.last_seen_ms = Some(now_ms);
        if record.server_ts > 0.0 {
            self.last_epoch_ms = record.server_ts;
        }
        if record.ts_epoch_ms > 0.0 {
            self.last_epoch_ms = record.ts_epoch_ms;
        }
        if let Some(iso) = &record.ts_iso {
            self.last_iso = Some(iso.clone());
        }

        self.label = record.status_label();
        self.kind = StatusKind::classify(&self.label);
        tracing::debug!(status = %self.label, "live update");
        self.latest = Some(record);
    }

    /// The live listener failed
    pub fn on_error(&mut self) {
        tracing::warn!("live feed error, marking device disconnected");
        self.mark_disconnected();
    }

    /// Watchdog check at `now_ms`; returns the resulting status
    pub fn tick(&mut self, now_ms: i64) -> StatusKind {
        match self.last_seen_ms {
            None => self.mark_disconnected(),
            Some(seen) if now_ms - seen > self.stale_after_ms => {
                if self.kind != StatusKind::Disconnected {
                    tracing::info!(age_ms = now_ms - seen, "live feed stale");
                }
                self.mark_disconnected();
            }
            Some(_) => {}
        }
        self.kind
    }

    fn mark_disconnected(&mut self) {
        self.kind = StatusKind::Disconnected;
        self.label = StatusKind::Disconnected.to_string();
    }

    /// Current status
    pub fn status(&self) -> StatusKind {
        self.kind
    }

    /// Badge text
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Last live record received
    pub fn latest(&self) -> Option<&LiveRecord> {
        self.latest.as_ref()
    }

    /// Last-update text in local time
    pub fn last_update_text(&self) -> String {
        self.last_update_text_in(&Local)
    }

    /// Last-update text: the device ISO stamp, else the formatted epoch, else
    /// `(time not synced)` once anything arrived, else a dash
    pub fn last_update_text_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        if let Some(iso) = self.last_iso.as_deref().filter(|s| !s.trim().is_empty()) {
            return iso.to_string();
        }
        if self.last_epoch_ms > 0.0 {
            return format_epoch_ms_in(self.last_epoch_ms as i64, tz);
        }
        if self.last_seen_ms.is_some() {
            return "(time not synced)".to_string();
        }
        DASH.to_string()
    }
}

/// Pick the newer of the live record and the newest history record. Ties go
/// to the live record.
pub fn freshest<'a>(
    live: Option<&'a LiveRecord>,
    history: &'a [LiveRecord],
) -> Option<&'a LiveRecord> {
    let newest = history
        .iter()
        .max_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
    match (live, newest) {
        (Some(l), Some(h)) if h.sort_key() > l.sort_key() => Some(h),
        (Some(l), _) => Some(l),
        (None, h) => h,
    }
}
