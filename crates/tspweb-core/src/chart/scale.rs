//! Pixel/data mapping for the x scale

use serde::{Deserialize, Serialize};

use super::ViewWindow;

/// Plotting area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRect {
    /// Left edge in pixels
    pub left: f64,
    /// Top edge in pixels
    pub top: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Default for PlotRect {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 800.0,
            height: 520.0,
        }
    }
}

impl PlotRect {
    /// Create a new plot rectangle
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bottom edge in pixels
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Linear x scale: a view window stretched over a plot rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XScale {
    /// Data range
    pub window: ViewWindow,
    /// Pixel range
    pub rect: PlotRect,
}

impl XScale {
    /// Create a new scale
    pub fn new(window: ViewWindow, rect: PlotRect) -> Self {
        Self { window, rect }
    }

    /// Data value at a pixel offset from the left edge of the plot area
    pub fn pos_to_val(&self, px: f64) -> f64 {
        if self.rect.width <= 0.0 {
            return self.window.min;
        }
        self.window.min + (px / self.rect.width) * self.window.width()
    }

    /// Pixel offset from the left edge of the plot area for a data value
    pub fn val_to_pos(&self, value: f64) -> f64 {
        let width = self.window.width();
        if width <= 0.0 {
            return 0.0;
        }
        (value - self.window.min) / width * self.rect.width
    }
}
