//! Session viewer context
//!
//! Owns everything one opened session needs: the reassembled log, the
//! model built from it, chart state, the playback clock and the playhead.
//! All mutation goes through [`SessionViewer::apply`], which leaves the
//! playhead, chart window and readouts consistent before returning.

use super::{Command, LoadError, SessionMeta};
use crate::chart::{ChartController, PlotRect, PointerEvent, RenderPlan, ViewWindow};
use crate::config::ViewerConfig;
use crate::datalog::{export_file_name, parse_csv, ReassembledCsv};
use crate::display::format_value;
use crate::playback::{FrameOutcome, PlaybackClock, PlaybackState};
use crate::timeseries::{ModelOptions, TimeSeriesModel};

/// An opened session
#[derive(Debug, Clone)]
pub struct SessionViewer {
    session_id: String,
    meta: SessionMeta,
    csv: ReassembledCsv,
    model: TimeSeriesModel,
    chart: ChartController,
    clock: PlaybackClock,
    playhead: usize,
    follow: bool,
    follow_margin: f64,
}

impl SessionViewer {
    /// Parse a reassembled log and set up chart and playback for it.
    ///
    /// Fails with [`LoadError::EmptyDataset`] when the log has no data rows.
    pub fn new(
        session_id: impl Into<String>,
        meta: SessionMeta,
        csv: ReassembledCsv,
        config: &ViewerConfig,
    ) -> Result<Self, LoadError> {
        let session_id = session_id.into();
        let table = parse_csv(&csv.to_csv_string())?;
        let model = TimeSeriesModel::build(&table, &ModelOptions::from(config));
        if model.is_empty() {
            return Err(LoadError::EmptyDataset(session_id));
        }

        let chart = ChartController::new(&model, config);
        let mut clock = PlaybackClock::new(model.axis());
        clock.set_speed(config.default_speed);

        tracing::info!(
            session = %session_id,
            rows = model.len(),
            series = model.series().len(),
            "session opened"
        );

        Ok(Self {
            session_id,
            meta,
            csv,
            model,
            chart,
            clock,
            playhead: 0,
            follow: false,
            follow_margin: config.follow_margin,
        })
    }

    /// Session identifier
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Session metadata
    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    /// Reassembled log
    pub fn csv(&self) -> &ReassembledCsv {
        &self.csv
    }

    /// Time-series model
    pub fn model(&self) -> &TimeSeriesModel {
        &self.model
    }

    /// Chart state
    pub fn chart(&self) -> &ChartController {
        &self.chart
    }

    /// Playback clock
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Current sample index
    pub fn playhead(&self) -> usize {
        self.playhead
    }

    /// Playback state
    pub fn playback_state(&self) -> PlaybackState {
        self.clock.state()
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Whether follow mode is on
    pub fn follow(&self) -> bool {
        self.follow
    }

    /// Largest scrub position
    pub fn scrub_max(&self) -> usize {
        self.model.len().saturating_sub(1)
    }

    /// Resize the plot area
    pub fn set_plot_rect(&mut self, rect: PlotRect) {
        self.chart.set_rect(rect);
    }

    /// Apply one command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Seek(index) | Command::Scrub(index) => {
                self.clock.pause();
                self.set_playhead(index, true);
            }
            Command::SetViewWindow { min, max } => {
                self.chart.set_view_window(ViewWindow::new(min, max));
            }
            Command::ResetView => self.chart.reset_view(),
            Command::SetSeriesVisible { key, visible } => {
                self.chart.set_series_visible(&key, visible);
            }
            Command::SetSeriesAxis { key, axis } => {
                if self.chart.set_series_axis(&key, axis) {
                    self.refresh_playhead();
                }
            }
            Command::SetRepresentation(representation) => {
                if self.chart.set_representation(representation) {
                    self.refresh_playhead();
                }
            }
            Command::SetInterpolation(interpolate) => {
                if self.chart.set_interpolation(interpolate) {
                    self.refresh_playhead();
                }
            }
            Command::SetFollow(follow) => self.follow = follow,
            Command::Play => {
                if self.clock.play() {
                    tracing::debug!(from = self.playhead, speed = self.clock.speed(), "playback started");
                }
            }
            Command::Pause => self.clock.pause(),
            Command::SetSpeed(speed) => self.clock.set_speed(speed),
            Command::Frame(timestamp) => match self.clock.frame(timestamp) {
                FrameOutcome::Idle => {}
                FrameOutcome::Advanced { index } | FrameOutcome::Finished { index } => {
                    self.set_playhead(index, false);
                }
            },
        }
    }

    /// Route pointer input through the chart and apply what it produces
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some(command) = self.chart.handle_pointer(event) {
            self.apply(command);
        }
    }

    /// Move the playhead. Authoritative moves also reset the playback
    /// cursor; playback-driven moves keep its fractional progress.
    fn set_playhead(&mut self, index: usize, authoritative: bool) {
        let axis = self.model.axis();
        let index = axis.clamp_index(index);
        self.playhead = index;
        if authoritative {
            self.clock.sync_to(index);
        }
        if self.follow {
            if let Some(t) = axis.value_at(index) {
                self.chart.follow(t, self.follow_margin);
            }
        }
    }

    fn refresh_playhead(&mut self) {
        self.set_playhead(self.playhead, false);
    }

    /// `t=<seconds>s` for the playhead
    pub fn time_readout(&self) -> String {
        format!("t={}s", format_value(self.model.axis().value_at(self.playhead)))
    }

    /// Raw values of the visible series at the playhead
    pub fn readout_values(&self) -> Vec<(&str, Option<f64>)> {
        self.chart
            .series()
            .iter()
            .zip(self.model.series())
            .filter(|(state, _)| state.visible)
            .map(|(state, data)| (state.key.as_str(), data.raw_at(self.playhead)))
            .collect()
    }

    /// `idx=<i>/<n-1>  |  t=<s>s  |  key=value ...` readout line
    pub fn value_readout(&self) -> String {
        let mut parts = vec![
            format!("idx={}/{}", self.playhead, self.scrub_max()),
            self.time_readout(),
        ];
        parts.extend(
            self.readout_values()
                .into_iter()
                .map(|(key, value)| format!("{key}={}", format_value(value))),
        );
        parts.join("  |  ")
    }

    /// Status line shown once the session is ready
    pub fn status_line(&self) -> String {
        format!(
            "Rows: {} | Click plot to move playhead | Play to animate",
            self.model.len()
        )
    }

    /// Draw description for the current state
    pub fn render_plan(&self) -> RenderPlan<'_> {
        self.chart.render_plan(&self.model, self.playhead)
    }

    /// Reassembled CSV text for download
    pub fn export_csv(&self) -> String {
        self.csv.to_csv_string()
    }

    /// Download name for [`export_csv`](Self::export_csv)
    pub fn export_file_name(&self) -> String {
        export_file_name(&self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::YAxis;
    use crate::datalog::{reassemble, LogChunk};
    use crate::timeseries::Representation;
    use std::time::Duration;

    fn viewer(rows: usize) -> SessionViewer {
        let mut csv = String::from("epoch_ms,i_rms,v_rms\n");
        for i in 0..rows {
            csv.push_str(&format!("{},{},{}\n", i * 1000, i, 230 + i));
        }
        let csv = reassemble(&[LogChunk::new("a", csv, 1.0)]).unwrap();
        SessionViewer::new("s1", SessionMeta::default(), csv, &ViewerConfig::default()).unwrap()
    }

    #[test]
    fn test_header_only_log_is_empty_dataset() {
        let csv = reassemble(&[LogChunk::new("a", "x,y\n", 1.0)]).unwrap();
        let err = SessionViewer::new("s1", SessionMeta::default(), csv, &ViewerConfig::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::EmptyDataset(ref sid) if sid == "s1"));
    }

    #[test]
    fn test_seek_and_scrub_clamp() {
        let mut v = viewer(5);
        v.apply(Command::Seek(99));
        assert_eq!(v.playhead(), 4);
        v.apply(Command::Scrub(2));
        assert_eq!(v.playhead(), 2);
        assert_eq!(v.clock().cursor(), 2.0);
    }

    #[test]
    fn test_scrub_pauses_playback() {
        let mut v = viewer(5);
        v.apply(Command::Play);
        assert!(v.is_playing());
        v.apply(Command::Scrub(1));
        assert!(!v.is_playing());
        assert_eq!(v.playhead(), 1);
    }

    #[test]
    fn test_frames_advance_playhead() {
        let mut v = viewer(10);
        v.apply(Command::Seek(3));
        v.apply(Command::Play);
        v.apply(Command::Frame(Duration::from_secs(10)));
        assert_eq!(v.playhead(), 3);
        v.apply(Command::Frame(Duration::from_millis(12_500)));
        assert_eq!(v.playhead(), 5);
        v.apply(Command::Frame(Duration::from_secs(60)));
        assert_eq!(v.playhead(), 9);
        assert!(!v.is_playing());
    }

    #[test]
    fn test_readout_uses_raw_values() {
        let mut v = viewer(3);
        v.apply(Command::SetRepresentation(Representation::Normalized));
        v.apply(Command::Seek(1));
        assert_eq!(v.value_readout(), "idx=1/2  |  t=1.000s  |  i_rms=1.000");

        v.apply(Command::SetSeriesVisible { key: "v_rms".into(), visible: true });
        assert_eq!(
            v.value_readout(),
            "idx=1/2  |  t=1.000s  |  i_rms=1.000  |  v_rms=231.0"
        );
    }

    #[test]
    fn test_follow_recenters_window() {
        let mut v = viewer(101);
        v.apply(Command::SetViewWindow { min: 0.0, max: 10.0 });
        v.apply(Command::SetFollow(true));
        v.apply(Command::Seek(5));
        assert_eq!(v.chart().window(), ViewWindow::new(0.0, 10.0));
        v.apply(Command::Seek(9));
        assert_eq!(v.chart().window(), ViewWindow::new(4.0, 14.0));
    }

    #[test]
    fn test_axis_change_keeps_playhead() {
        let mut v = viewer(5);
        v.apply(Command::Seek(3));
        v.apply(Command::SetSeriesAxis { key: "i_rms".into(), axis: YAxis::Secondary });
        assert_eq!(v.playhead(), 3);
        assert_eq!(v.chart().generation(), 1);
    }

    #[test]
    fn test_click_on_chart_seeks() {
        let mut v = viewer(5);
        v.set_plot_rect(PlotRect::new(0.0, 0.0, 400.0, 100.0));
        v.handle_pointer(PointerEvent::Down { x: 260.0, pan: false });
        v.handle_pointer(PointerEvent::Up { x: 260.0 });
        assert_eq!(v.playhead(), 3);

        v.handle_pointer(PointerEvent::Wheel { x: 200.0, delta_y: -120.0 });
        assert!(v.chart().window().width() < 4.0);
        v.handle_pointer(PointerEvent::DoubleClick);
        assert_eq!(v.chart().window(), ViewWindow::new(0.0, 4.0));
    }

    #[test]
    fn test_export() {
        let v = viewer(2);
        assert_eq!(v.export_file_name(), "TSP_ML_s1.csv");
        assert_eq!(v.export_csv(), "epoch_ms,i_rms,v_rms\n0,0,230\n1000,1,231\n");
    }
}
