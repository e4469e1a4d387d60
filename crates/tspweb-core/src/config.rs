//! Viewer configuration stored in viewer.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default series colors, cycled by column order
pub const DEFAULT_PALETTE: [&str; 12] = [
    "#2ecc71", "#e74c3c", "#3498db", "#f1c40f", "#9b59b6", "#1abc9c", "#e67e22", "#ecf0f1",
    "#00bcd4", "#ff4081", "#cddc39", "#ff9800",
];

/// Session viewer and dashboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Realtime database URL (e.g. `https://<project>.firebasedatabase.app`)
    pub database_url: Option<String>,

    /// Optional `auth` token appended to REST requests
    pub auth_token: Option<String>,

    /// Millisecond epoch column used for the time axis
    pub epoch_column: String,

    /// Identifier/metadata columns that are never plotted
    pub excluded_columns: Vec<String>,

    /// Series shown when a session is first opened
    pub default_visible: Vec<String>,

    /// Series placed on the secondary (right) axis by default
    pub default_secondary: Vec<String>,

    /// Series colors, cycled by column order
    pub palette: Vec<String>,

    /// Width factor applied per zoom-in wheel step
    pub zoom_in_factor: f64,

    /// Width factor applied per zoom-out wheel step
    pub zoom_out_factor: f64,

    /// Minimum drag width in pixels for a box selection
    pub min_select_px: f64,

    /// Fraction of the view width near each edge that triggers follow re-centering
    pub follow_margin: f64,

    /// Playback speed on open
    pub default_speed: f64,

    /// Live feed is considered disconnected after this long without an update
    pub stale_after_ms: u64,

    /// Number of history records kept for the history table
    pub history_limit: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            database_url: None,
            auth_token: None,
            epoch_column: "epoch_ms".to_string(),
            excluded_columns: strings(&["timestamp", "session_id", "load_type"]),
            default_visible: strings(&["i_rms", "thd_pct", "spectral_entropy", "spectral_flatness"]),
            default_secondary: strings(&["thd_pct", "v_rms", "temp_c"]),
            palette: strings(&DEFAULT_PALETTE),
            zoom_in_factor: 0.85,
            zoom_out_factor: 1.18,
            min_select_px: 10.0,
            follow_margin: 0.12,
            default_speed: 1.0,
            stale_after_ms: 8000,
            history_limit: 50,
        }
    }
}

impl ViewerConfig {
    /// Default config file location (`<config dir>/tspweb/viewer.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tspweb").join("viewer.json"))
    }

    /// Load config from a file
    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Load config from a file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> io::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Save config to a file, creating parent directories
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)
    }

    /// Color for the series at a column position
    pub fn color_for(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
        }
        &self.palette[index % self.palette.len()]
    }

    /// Playback speed to use for a requested value; non-positive or
    /// non-finite speeds fall back to 1.0
    pub fn sanitize_speed(speed: f64) -> f64 {
        if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        }
    }
}
