//! Session metadata

use serde::{Deserialize, Serialize};

use crate::display::DASH;

/// Ground-truth label forced for a session (`-1` / `0` / `1` in the store)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LabelOverride {
    /// Label taken from the device's own arc decision
    #[default]
    Auto,
    /// Every sample labelled normal
    Normal,
    /// Every sample labelled arcing
    Arc,
}

impl From<i64> for LabelOverride {
    fn from(value: i64) -> Self {
        match value {
            0 => LabelOverride::Normal,
            1 => LabelOverride::Arc,
            _ => LabelOverride::Auto,
        }
    }
}

impl From<LabelOverride> for i64 {
    fn from(value: LabelOverride) -> Self {
        match value {
            LabelOverride::Auto => -1,
            LabelOverride::Normal => 0,
            LabelOverride::Arc => 1,
        }
    }
}

/// A recorded logging interval, as stored under `ml_sessions/<sid>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionMeta {
    /// Epoch ms when logging was enabled
    pub start_ms: Option<i64>,
    /// Epoch ms when logging was disabled; `None` while still recording
    pub end_ms: Option<i64>,
    /// Free-form description of the attached load
    pub load_type: Option<String>,
    /// Configured capture duration in seconds
    pub duration_s: Option<f64>,
    /// Forced ground-truth label
    pub label_override: LabelOverride,
}

impl SessionMeta {
    /// Check if the session is still recording
    pub fn is_open(&self) -> bool {
        self.end_ms.is_none()
    }

    /// Wall-clock length of a closed session in milliseconds
    pub fn elapsed_ms(&self) -> Option<i64> {
        Some(self.end_ms? - self.start_ms?)
    }

    /// One-line summary: `load=<type>  duration=<s>s`
    pub fn summary(&self) -> String {
        let load = self.load_type.as_deref().unwrap_or(DASH);
        let duration = self
            .duration_s
            .map_or_else(|| DASH.to_string(), |d| d.to_string());
        format!("load={load}  duration={duration}s")
    }
}
