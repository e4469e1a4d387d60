//! Viewer commands
//!
//! Every change to a [`SessionViewer`](super::SessionViewer) goes through one
//! of these, whether it comes from a pointer, a control, or the frame timer.

use std::time::Duration;

use crate::chart::YAxis;
use crate::timeseries::Representation;

/// A state change request for the session viewer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Move the playhead to a sample (user driven, pauses playback)
    Seek(usize),
    /// Scrub control moved to a sample (pauses playback first)
    Scrub(usize),
    /// Replace the visible x range
    SetViewWindow {
        /// Left bound
        min: f64,
        /// Right bound
        max: f64,
    },
    /// Restore the full x range
    ResetView,
    /// Show or hide a series
    SetSeriesVisible {
        /// Series column name
        key: String,
        /// Show when `true`
        visible: bool,
    },
    /// Move a series to the primary or secondary y axis
    SetSeriesAxis {
        /// Series column name
        key: String,
        /// Target axis
        axis: YAxis,
    },
    /// Plot raw or normalized values
    SetRepresentation(Representation),
    /// Draw lines as splines instead of straight segments
    SetInterpolation(bool),
    /// Keep the playhead inside the view window while it moves
    SetFollow(bool),
    /// Start playback
    Play,
    /// Stop playback
    Pause,
    /// Change the playback speed multiplier
    SetSpeed(f64),
    /// Animation frame at the given monotonic timestamp
    Frame(Duration),
}
