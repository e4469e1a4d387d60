//! Generated-input tests for reassembly, the time axis, normalization and
//! the playback reducer

use std::time::Duration;

use proptest::prelude::*;
use tspweb_core::config::ViewerConfig;
use tspweb_core::datalog::{reassemble, LogChunk};
use tspweb_core::playback::PlaybackState;
use tspweb_core::session::{Command, SessionMeta, SessionViewer};
use tspweb_core::timeseries::{normalize, TimeAxis};

/// Chunk bodies in upload order: data rows plus whether the header repeats
fn chunk_bodies() -> impl Strategy<Value = Vec<(Vec<u32>, bool)>> {
    prop::collection::vec(
        (prop::collection::vec(0u32..10_000, 0..6), any::<bool>()),
        1..8,
    )
}

fn upload(bodies: &[(Vec<u32>, bool)]) -> (Vec<LogChunk>, String) {
    let mut expected = String::from("h\n");
    let chunks = bodies
        .iter()
        .enumerate()
        .map(|(i, (rows, repeat_header))| {
            let mut csv = String::new();
            if i == 0 || *repeat_header {
                csv.push_str("h\n");
            }
            for row in rows {
                csv.push_str(&format!("{row}\n"));
                expected.push_str(&format!("{row}\n"));
            }
            LogChunk::new(format!("k{i}"), csv, 1_000.0 + i as f64)
        })
        .collect();
    (chunks, expected)
}

/// Non-decreasing epochs built from a start and non-negative steps
fn ordered_epochs() -> impl Strategy<Value = Vec<f64>> {
    (
        0u64..2_000_000_000_000,
        prop::collection::vec(0u64..5_000, 0..40),
    )
        .prop_map(|(start, steps)| {
            let mut t = start;
            let mut epochs = vec![t as f64];
            for step in steps {
                t += step;
                epochs.push(t as f64);
            }
            epochs
        })
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (0usize..60).prop_map(Command::Seek),
        (0usize..60).prop_map(Command::Scrub),
        Just(Command::Play),
        Just(Command::Pause),
        any::<f64>().prop_map(Command::SetSpeed),
        (0u64..30_000).prop_map(|ms| Command::Frame(Duration::from_millis(ms))),
    ]
}

fn viewer(rows: usize, step_ms: usize) -> SessionViewer {
    let mut csv = String::from("epoch_ms,i_rms\n");
    for i in 0..rows {
        csv.push_str(&format!("{},{}\n", 5_000 + i * step_ms, i % 5));
    }
    let csv = reassemble(&[LogChunk::new("k", csv, 0.0)]).unwrap();
    SessionViewer::new("s1", SessionMeta::default(), csv, &ViewerConfig::default()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_reassembly_ignores_arrival_order(
        (bodies, order) in chunk_bodies().prop_flat_map(|bodies| {
            let indices: Vec<usize> = (0..bodies.len()).collect();
            (Just(bodies), Just(indices).prop_shuffle())
        })
    ) {
        let (chunks, expected) = upload(&bodies);
        let shuffled: Vec<LogChunk> = order.iter().map(|&i| chunks[i].clone()).collect();
        let csv = reassemble(&shuffled).unwrap();
        prop_assert_eq!(csv.header(), "h");
        prop_assert_eq!(csv.to_csv_string(), expected);
    }

    #[test]
    fn test_axis_starts_at_zero_and_never_decreases(
        epochs in prop::collection::vec(prop::option::weighted(0.95, 0.0..1e13f64), 1..40)
    ) {
        let axis = TimeAxis::from_epoch_ms(&epochs);
        prop_assert_eq!(axis.len(), epochs.len());
        prop_assert_eq!(axis.values()[0], 0.0);
        prop_assert!(axis.values().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_nearest_index_is_closest_sample(
        epochs in ordered_epochs(),
        probe in -10.0..250_000.0f64
    ) {
        let axis = TimeAxis::from_epoch_ms(&epochs.iter().copied().map(Some).collect::<Vec<_>>());
        let value = probe / 1000.0;
        let index = axis.nearest_index(value).unwrap();
        let best = (value - axis.values()[index]).abs();
        for (j, x) in axis.values().iter().enumerate() {
            prop_assert!(best <= (value - x).abs(), "index {} beaten by {}", index, j);
        }
    }

    #[test]
    fn test_normalized_values_stay_in_unit_range(
        raw in prop::collection::vec(prop::option::weighted(0.8, -1e9..1e9f64), 0..50)
    ) {
        let normalized = normalize(&raw);
        prop_assert_eq!(normalized.len(), raw.len());
        for (r, n) in raw.iter().zip(&normalized) {
            prop_assert_eq!(r.is_none(), n.is_none());
            if let Some(n) = n {
                prop_assert!((0.0..=1.0).contains(n), "{} out of range", n);
            }
        }
    }

    #[test]
    fn test_playhead_clamped_under_any_command_sequence(
        rows in 1usize..30,
        step_ms in 1usize..2_000,
        commands in prop::collection::vec(command(), 0..80)
    ) {
        let mut v = viewer(rows, step_ms);
        let mut end_pauses = 0;
        for command in commands {
            let before = v.playback_state();
            let playhead = v.playhead();
            let is_frame = matches!(command, Command::Frame(_));
            if command == Command::Play {
                end_pauses = 0;
            }
            v.apply(command);

            prop_assert!(v.playhead() <= v.scrub_max());
            if is_frame && before == PlaybackState::Paused {
                prop_assert_eq!(v.playback_state(), PlaybackState::Paused);
                prop_assert_eq!(v.playhead(), playhead);
            }
            if is_frame && before == PlaybackState::Playing && v.playback_state() == PlaybackState::Paused {
                prop_assert_eq!(v.playhead(), v.scrub_max());
                end_pauses += 1;
                prop_assert!(end_pauses <= 1);
            }
        }
    }
}
