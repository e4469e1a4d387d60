//! Tests for playback through the session viewer

use std::time::Duration;

use pretty_assertions::assert_eq;
use tspweb_core::chart::{PlotRect, PointerEvent, ViewWindow};
use tspweb_core::config::ViewerConfig;
use tspweb_core::datalog::{reassemble, LogChunk};
use tspweb_core::playback::{run_playback, PlaybackClock, PlaybackState, DEFAULT_FRAME_INTERVAL};
use tspweb_core::session::{Command, SessionMeta, SessionViewer};
use tspweb_core::timeseries::TimeAxis;

fn viewer(rows: usize, step_ms: usize) -> SessionViewer {
    let mut csv = String::from("epoch_ms,i_rms,thd_pct\n");
    for i in 0..rows {
        csv.push_str(&format!("{},{},{}\n", 1_000_000 + i * step_ms, i % 7, 3 + i % 3));
    }
    let csv = reassemble(&[LogChunk::new("k", csv, 0.0)]).unwrap();
    SessionViewer::new("s1", SessionMeta::default(), csv, &ViewerConfig::default()).unwrap()
}

#[test]
fn test_half_second_frames_advance_every_other_frame() {
    let axis = TimeAxis::sample_index(10);
    let mut clock = PlaybackClock::new(&axis);
    assert!(clock.play());
    clock.frame(Duration::ZERO);

    let mut indices = Vec::new();
    for n in 1..=4 {
        clock.frame(Duration::from_millis(500 * n));
        indices.push(clock.index());
    }
    assert_eq!(indices, vec![0, 1, 1, 2]);
    assert_eq!(clock.cursor(), 2.0);
}

#[test]
fn test_end_of_data_pauses_once() {
    let mut v = viewer(4, 1000);
    v.apply(Command::Play);
    v.apply(Command::Frame(Duration::ZERO));
    v.apply(Command::Frame(Duration::from_secs(100)));
    assert_eq!(v.playhead(), 3);
    assert_eq!(v.playback_state(), PlaybackState::Paused);

    v.apply(Command::Frame(Duration::from_secs(200)));
    assert_eq!(v.playhead(), 3);
    assert_eq!(v.playback_state(), PlaybackState::Paused);
}

#[test]
fn test_playhead_stays_in_range_under_mixed_input() {
    let mut v = viewer(20, 250);
    v.set_plot_rect(PlotRect::new(0.0, 0.0, 500.0, 200.0));
    let steps = [
        Command::Seek(50),
        Command::Play,
        Command::Frame(Duration::ZERO),
        Command::Frame(Duration::from_millis(300)),
        Command::Scrub(0),
        Command::SetSpeed(8.0),
        Command::Play,
        Command::Frame(Duration::from_secs(1)),
        Command::Frame(Duration::from_secs(2)),
    ];
    for step in steps {
        v.apply(step);
        assert!(v.playhead() <= v.scrub_max());
    }
    v.handle_pointer(PointerEvent::Down { x: 1000.0, pan: false });
    v.handle_pointer(PointerEvent::Up { x: 1000.0 });
    assert_eq!(v.playhead(), 19);
}

#[test]
fn test_user_seek_cancels_playback_progress() {
    let mut v = viewer(10, 1000);
    v.apply(Command::Play);
    v.apply(Command::Frame(Duration::ZERO));
    v.apply(Command::Frame(Duration::from_millis(2500)));
    assert_eq!(v.playhead(), 2);
    assert_eq!(v.clock().cursor(), 2.5);

    v.apply(Command::Seek(6));
    assert!(!v.is_playing());
    assert_eq!(v.clock().cursor(), 6.0);
}

#[test]
fn test_drag_select_zooms_and_reset_restores() {
    let mut v = viewer(11, 1000);
    v.set_plot_rect(PlotRect::new(0.0, 0.0, 1000.0, 300.0));
    v.handle_pointer(PointerEvent::Down { x: 200.0, pan: false });
    v.handle_pointer(PointerEvent::Move { x: 500.0 });
    v.handle_pointer(PointerEvent::Up { x: 500.0 });
    assert_eq!(v.chart().window(), ViewWindow::new(2.0, 5.0));
    assert_eq!(v.playhead(), 0);

    v.apply(Command::ResetView);
    assert_eq!(v.chart().window(), ViewWindow::new(0.0, 10.0));
}

#[tokio::test(start_paused = true)]
async fn test_driver_runs_until_end_of_data() {
    let mut v = viewer(10, 1000);
    v.apply(Command::SetSpeed(8.0));
    v.apply(Command::Play);

    let mut seen = Vec::new();
    let frames = run_playback(&mut v, DEFAULT_FRAME_INTERVAL, |v| seen.push(v.playhead())).await;

    assert!(frames > 1);
    assert_eq!(seen.len(), frames);
    assert_eq!(v.playhead(), 9);
    assert!(!v.is_playing());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test(start_paused = true)]
async fn test_driver_stops_on_pause_from_callback() {
    let mut v = viewer(1000, 1000);
    v.apply(Command::Play);
    let frames = run_playback(&mut v, DEFAULT_FRAME_INTERVAL, |v| {
        if v.playhead() >= 1 {
            v.apply(Command::Pause);
        }
    })
    .await;
    assert!(frames > 1);
    assert_eq!(v.playhead(), 1);
}

#[tokio::test]
async fn test_driver_does_nothing_when_paused() {
    let mut v = viewer(5, 1000);
    assert_eq!(run_playback(&mut v, DEFAULT_FRAME_INTERVAL, |_| {}).await, 0);
}
