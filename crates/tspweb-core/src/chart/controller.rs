//! Interactive chart controller
//!
//! Holds everything about a chart that is not data: the view window, which
//! series are shown on which axis, and in-progress pointer gestures. Pointer
//! input is translated into [`Command`]s; the controller never moves the
//! playhead itself.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{PlotRect, ViewWindow, XScale};
use crate::config::ViewerConfig;
use crate::session::Command;
use crate::timeseries::{Representation, TimeAxis, TimeSeriesModel};

/// Y axis a series is scaled against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YAxis {
    /// Left axis
    #[default]
    #[serde(rename = "y")]
    Primary,
    /// Right axis
    #[serde(rename = "y2")]
    Secondary,
}

/// Display state of one series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesState {
    /// Series column name
    pub key: String,
    /// CSS color string
    pub color: String,
    /// Drawn on the chart
    pub visible: bool,
    /// Assigned axis (ignored while plotting normalized values)
    pub axis: YAxis,
}

/// Pointer input over the plot area; `x` is relative to its left edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Scroll step; negative `delta_y` zooms in
    Wheel {
        /// Pointer x
        x: f64,
        /// Scroll amount
        delta_y: f64,
    },
    /// Primary button pressed; `pan` when the pan modifier is held
    Down {
        /// Pointer x
        x: f64,
        /// Pan modifier held
        pan: bool,
    },
    /// Pointer moved
    Move {
        /// Pointer x
        x: f64,
    },
    /// Primary button released
    Up {
        /// Pointer x
        x: f64,
    },
    /// Double click
    DoubleClick,
}

/// Box-select overlay in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Left edge relative to the plot area
    pub left: f64,
    /// Width, never negative
    pub width: f64,
}

/// Vertical playhead line in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayheadMarker {
    /// Absolute x, snapped to the pixel center
    pub x: f64,
    /// Top of the plot area
    pub top: f64,
    /// Bottom of the plot area
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Panning { start_x: f64, start_window: ViewWindow },
    Selecting { start_x: f64 },
}

/// Interaction tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Width multiplier for a wheel step up
    pub zoom_in_factor: f64,
    /// Width multiplier for a wheel step down
    pub zoom_out_factor: f64,
    /// Narrower drags count as a click
    pub min_select_px: f64,
}

impl From<&ViewerConfig> for ChartOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            zoom_in_factor: config.zoom_in_factor,
            zoom_out_factor: config.zoom_out_factor,
            min_select_px: config.min_select_px,
        }
    }
}

/// One series as it should be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSeries<'a> {
    /// Series column name
    pub key: &'a str,
    /// CSS color string
    pub color: &'a str,
    /// Axis the values are scaled against
    pub axis: YAxis,
    /// Raw or normalized samples, aligned with the x values
    pub values: &'a [Option<f64>],
}

/// Everything a surface needs to draw the chart
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan<'a> {
    /// Changes whenever the chart instance has to be rebuilt
    pub generation: u64,
    /// Visible x range
    pub window: ViewWindow,
    /// Which values are plotted
    pub representation: Representation,
    /// Draw splines
    pub interpolate: bool,
    /// Shared x values
    pub x: &'a [f64],
    /// Visible series only
    pub series: Vec<RenderSeries<'a>>,
    /// Left axis range inside the window
    pub primary_range: Option<(f64, f64)>,
    /// Right axis range inside the window
    pub secondary_range: Option<(f64, f64)>,
    /// Playhead line, if the axis has samples
    pub playhead: Option<PlayheadMarker>,
}

/// Chart state for one session
#[derive(Debug, Clone)]
pub struct ChartController {
    axis: Arc<TimeAxis>,
    full: ViewWindow,
    window: ViewWindow,
    rect: PlotRect,
    series: Vec<SeriesState>,
    representation: Representation,
    interpolate: bool,
    generation: u64,
    gesture: Gesture,
    selection: Option<Selection>,
    options: ChartOptions,
}

impl ChartController {
    /// Create a chart over a model, seeding visibility, axis and color of
    /// each series from the config
    pub fn new(model: &TimeSeriesModel, config: &ViewerConfig) -> Self {
        let axis = Arc::clone(model.axis());
        let full = ViewWindow::full(&axis);
        let series = model
            .keys()
            .enumerate()
            .map(|(i, key)| SeriesState {
                key: key.to_string(),
                color: config.color_for(i).to_string(),
                visible: config.default_visible.iter().any(|k| k == key),
                axis: if config.default_secondary.iter().any(|k| k == key) {
                    YAxis::Secondary
                } else {
                    YAxis::Primary
                },
            })
            .collect();

        Self {
            axis,
            full,
            window: full,
            rect: PlotRect::default(),
            series,
            representation: Representation::Raw,
            interpolate: false,
            generation: 0,
            gesture: Gesture::Idle,
            selection: None,
            options: ChartOptions::from(config),
        }
    }

    /// Rebuild counter
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current view window
    pub fn window(&self) -> ViewWindow {
        self.window
    }

    /// Full axis range
    pub fn full_window(&self) -> ViewWindow {
        self.full
    }

    /// Plot area in pixels
    pub fn rect(&self) -> PlotRect {
        self.rect
    }

    /// Resize the plot area
    pub fn set_rect(&mut self, rect: PlotRect) {
        self.rect = rect;
    }

    /// Current x scale
    pub fn scale(&self) -> XScale {
        XScale::new(self.window, self.rect)
    }

    /// Plotted representation
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Whether lines are drawn as splines
    pub fn interpolate(&self) -> bool {
        self.interpolate
    }

    /// Display state of all series, in model order
    pub fn series(&self) -> &[SeriesState] {
        &self.series
    }

    /// Display state of one series
    pub fn series_state(&self, key: &str) -> Option<&SeriesState> {
        self.series.iter().find(|s| s.key == key)
    }

    /// Active box-select overlay
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Axis a series is actually drawn against. Normalized values all share
    /// the primary axis.
    pub fn effective_axis(&self, state: &SeriesState) -> YAxis {
        match self.representation {
            Representation::Normalized => YAxis::Primary,
            Representation::Raw => state.axis,
        }
    }

    /// Translate pointer input into a viewer command
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<Command> {
        match event {
            PointerEvent::Wheel { x, delta_y } => {
                if delta_y == 0.0 {
                    return None;
                }
                let factor = if delta_y < 0.0 {
                    self.options.zoom_in_factor
                } else {
                    self.options.zoom_out_factor
                };
                let anchor = self.scale().pos_to_val(x);
                let zoomed = self.window.zoom_at(anchor, factor);
                Some(Command::SetViewWindow {
                    min: zoomed.min,
                    max: zoomed.max,
                })
            }
            PointerEvent::Down { x, pan: true } => {
                self.selection = None;
                self.gesture = Gesture::Panning {
                    start_x: x,
                    start_window: self.window,
                };
                None
            }
            PointerEvent::Down { x, pan: false } => {
                self.selection = Some(Selection { left: x, width: 0.0 });
                self.gesture = Gesture::Selecting { start_x: x };
                None
            }
            PointerEvent::Move { x } => match self.gesture {
                Gesture::Idle => None,
                Gesture::Panning {
                    start_x,
                    start_window,
                } => {
                    let scale = XScale::new(start_window, self.rect);
                    let delta = scale.pos_to_val(start_x) - scale.pos_to_val(x);
                    let moved = start_window.shifted(delta);
                    Some(Command::SetViewWindow {
                        min: moved.min,
                        max: moved.max,
                    })
                }
                Gesture::Selecting { start_x } => {
                    self.selection = Some(Selection {
                        left: start_x.min(x),
                        width: (x - start_x).abs(),
                    });
                    None
                }
            },
            PointerEvent::Up { x } => {
                let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
                self.selection = None;
                match gesture {
                    Gesture::Idle | Gesture::Panning { .. } => None,
                    Gesture::Selecting { start_x } => {
                        let left = start_x.min(x);
                        let width = (x - start_x).abs();
                        let scale = self.scale();
                        if width >= self.options.min_select_px {
                            Some(Command::SetViewWindow {
                                min: scale.pos_to_val(left),
                                max: scale.pos_to_val(left + width),
                            })
                        } else {
                            self.axis
                                .nearest_index(scale.pos_to_val(x))
                                .map(Command::Seek)
                        }
                    }
                }
            }
            PointerEvent::DoubleClick => {
                self.gesture = Gesture::Idle;
                self.selection = None;
                Some(Command::ResetView)
            }
        }
    }

    /// Replace the view window. Non-finite or empty windows are ignored.
    pub fn set_view_window(&mut self, window: ViewWindow) -> bool {
        if !window.min.is_finite() || !window.max.is_finite() || window.width() <= 0.0 {
            tracing::debug!(?window, "ignoring degenerate view window");
            return false;
        }
        self.window = window;
        true
    }

    /// Restore the full axis range
    pub fn reset_view(&mut self) {
        self.window = self.full;
    }

    /// Show or hide a series. Only the drawn set changes; no rebuild.
    pub fn set_series_visible(&mut self, key: &str, visible: bool) -> bool {
        match self.series.iter_mut().find(|s| s.key == key) {
            Some(state) if state.visible != visible => {
                state.visible = visible;
                true
            }
            _ => false,
        }
    }

    /// Assign a series to an axis; rebuilds the chart when it changes
    pub fn set_series_axis(&mut self, key: &str, axis: YAxis) -> bool {
        match self.series.iter_mut().find(|s| s.key == key) {
            Some(state) if state.axis != axis => {
                state.axis = axis;
                self.rebuild();
                true
            }
            _ => false,
        }
    }

    /// Switch between raw and normalized values; rebuilds when it changes
    pub fn set_representation(&mut self, representation: Representation) -> bool {
        if self.representation == representation {
            return false;
        }
        self.representation = representation;
        self.rebuild();
        true
    }

    /// Toggle spline interpolation; rebuilds when it changes
    pub fn set_interpolation(&mut self, interpolate: bool) -> bool {
        if self.interpolate == interpolate {
            return false;
        }
        self.interpolate = interpolate;
        self.rebuild();
        true
    }

    /// New chart instance: scale domains change, so the view window and any
    /// gesture in progress are dropped
    fn rebuild(&mut self) {
        self.generation += 1;
        self.window = self.full;
        self.gesture = Gesture::Idle;
        self.selection = None;
        tracing::debug!(generation = self.generation, "chart rebuilt");
    }

    /// Keep `value` away from the window edges, see [`ViewWindow::follow`]
    pub fn follow(&mut self, value: f64, margin: f64) -> bool {
        match self.window.follow(value, margin) {
            Some(window) => {
                self.window = window;
                true
            }
            None => false,
        }
    }

    /// Y range over visible series on `axis`, limited to samples inside
    /// the view window. Nulls are skipped.
    pub fn y_range(&self, model: &TimeSeriesModel, axis: YAxis) -> Option<(f64, f64)> {
        let x = self.axis.values();
        let start = x.partition_point(|&v| v < self.window.min);
        let end = x.partition_point(|&v| v <= self.window.max);
        if start >= end {
            return None;
        }

        let mut range: Option<(f64, f64)> = None;
        for (i, state) in self.series.iter().enumerate() {
            if !state.visible || self.effective_axis(state) != axis {
                continue;
            }
            let values = model.values(i, self.representation);
            for v in values.get(start..end).unwrap_or_default().iter().flatten() {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                    None => (*v, *v),
                });
            }
        }
        range
    }

    /// Marker for the playhead at `index`, clamped into the axis
    pub fn playhead_marker(&self, index: usize) -> Option<PlayheadMarker> {
        let value = self.axis.value_at(index)?;
        let x = self.rect.left + self.scale().val_to_pos(value);
        Some(PlayheadMarker {
            x: x.round() + 0.5,
            top: self.rect.top,
            bottom: self.rect.bottom(),
        })
    }

    /// Draw description for the current state
    pub fn render_plan<'a>(&'a self, model: &'a TimeSeriesModel, playhead: usize) -> RenderPlan<'a> {
        let series = self
            .series
            .iter()
            .enumerate()
            .filter(|(_, state)| state.visible)
            .map(|(i, state)| RenderSeries {
                key: &state.key,
                color: &state.color,
                axis: self.effective_axis(state),
                values: model.values(i, self.representation),
            })
            .collect();

        RenderPlan {
            generation: self.generation,
            window: self.window,
            representation: self.representation,
            interpolate: self.interpolate,
            x: self.axis.values(),
            series,
            primary_range: self.y_range(model, YAxis::Primary),
            secondary_range: self.y_range(model, YAxis::Secondary),
            playhead: self.playhead_marker(playhead),
        }
    }
}
