//! Visible x range of a chart

use serde::{Deserialize, Serialize};

use crate::timeseries::TimeAxis;

/// Visible data-space range of the x axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewWindow {
    /// Left bound
    pub min: f64,
    /// Right bound
    pub max: f64,
}

impl ViewWindow {
    /// Create a window; bounds are swapped if given in reverse
    pub fn new(min: f64, max: f64) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// Full range of an axis. A single-valued axis is padded by half a unit
    /// on each side so the scale never collapses.
    pub fn full(axis: &TimeAxis) -> Self {
        match axis.range() {
            Some((first, last)) if last > first => Self::new(first, last),
            Some((first, _)) => Self::new(first - 0.5, first + 0.5),
            None => Self::new(0.0, 1.0),
        }
    }

    /// Width of the window
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Scale the width by `factor` while keeping `anchor` at the same
    /// relative position inside the window
    pub fn zoom_at(&self, anchor: f64, factor: f64) -> Self {
        let width = self.width();
        if width <= 0.0 || !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let left_ratio = (anchor - self.min) / width;
        let new_width = width * factor;
        let min = anchor - left_ratio * new_width;
        Self {
            min,
            max: min + new_width,
        }
    }

    /// Shift both bounds by `delta`
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Same width, centered on `value`
    pub fn centered_on(&self, value: f64) -> Self {
        let half = self.width() / 2.0;
        Self {
            min: value - half,
            max: value + half,
        }
    }

    /// Re-center on `value` if it lies within `margin` (fraction of the
    /// width) of either edge, or outside the window
    pub fn follow(&self, value: f64, margin: f64) -> Option<Self> {
        let edge = self.width() * margin;
        if value < self.min + edge || value > self.max - edge {
            Some(self.centered_on(value))
        } else {
            None
        }
    }
}
