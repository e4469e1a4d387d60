//! Chart
//!
//! View window, per-series display state, pointer gestures and the playhead
//! overlay for the session chart. Nothing here draws pixels; a surface reads
//! a [`RenderPlan`] and draws it.

mod controller;
mod scale;
mod view;

pub use controller::{
    ChartController, ChartOptions, PlayheadMarker, PointerEvent, RenderPlan, RenderSeries,
    Selection, SeriesState, YAxis,
};
pub use scale::{PlotRect, XScale};
pub use view::ViewWindow;
