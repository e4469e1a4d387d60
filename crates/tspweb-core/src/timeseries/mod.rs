//! Time Series
//!
//! Typed columns, the shared time axis and normalized views of a session log.

mod axis;
mod model;
mod series;

pub use axis::{AxisKind, TimeAxis, MIN_SPACING};
pub use model::{ModelOptions, TimeSeriesModel};
pub use series::{normalize, SeriesData, SeriesStats, NORMALIZE_EPSILON};

use serde::{Deserialize, Serialize};

/// Which variant of the series values is plotted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Values in their measured units
    #[default]
    Raw,
    /// Per-series min/max rescaled to `[0, 1]`
    Normalized,
}
