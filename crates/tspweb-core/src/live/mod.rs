//! Live Telemetry
//!
//! The device publishes its latest measurement to `live_data` and appends
//! periodic copies to `history`. This module classifies device status,
//! watches for a stalled feed, and orders and exports history records.

mod history;
mod status;

pub use history::{filter_by_kind, latest_first, time_text, write_history_csv, HISTORY_CSV_HEADER};
pub use status::{freshest, LiveMonitor, StatusKind};

use serde::{Deserialize, Serialize};

use crate::display::fixed_or_dash;

/// One live or history record; every field is optional on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveRecord {
    /// RMS voltage (V)
    pub voltage: Option<f64>,
    /// RMS current (A)
    pub current: Option<f64>,
    /// Temperature (°C)
    pub temp: Option<f64>,
    /// Zero-crossing variance
    pub zcv: Option<f64>,
    /// Total harmonic distortion (%)
    pub thd: Option<f64>,
    /// Spectral entropy
    pub entropy: Option<f64>,
    /// Free-form device status label
    pub status: Option<String>,
    /// Server write time in epoch ms, `0` when absent
    pub server_ts: f64,
    /// Device clock in epoch ms, `0` when unsynced
    pub ts_epoch_ms: f64,
    /// Device clock as an ISO-8601 string
    pub ts_iso: Option<String>,
}

impl LiveRecord {
    /// Ordering timestamp: server time, falling back to device time
    pub fn sort_key(&self) -> f64 {
        if self.server_ts > 0.0 {
            self.server_ts
        } else {
            self.ts_epoch_ms
        }
    }

    /// Upper-cased status label, `CONNECTED` when the device sent none
    pub fn status_label(&self) -> String {
        self.status
            .as_deref()
            .unwrap_or("CONNECTED")
            .to_uppercase()
    }

    /// Non-blank ISO timestamp
    pub fn iso(&self) -> Option<&str> {
        self.ts_iso.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Measurement cells with the dashboard's fixed precision, in
    /// `voltage, current, temp, zcv, thd, entropy` order
    pub fn formatted_values(&self) -> [String; 6] {
        [
            fixed_or_dash(self.voltage, 1),
            fixed_or_dash(self.current, 2),
            fixed_or_dash(self.temp, 1),
            fixed_or_dash(self.zcv, 2),
            fixed_or_dash(self.thd, 1),
            fixed_or_dash(self.entropy, 3),
        ]
    }
}
