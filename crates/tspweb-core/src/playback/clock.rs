//! Playback clock
//!
//! Advances a fractional sample cursor from real elapsed time. The clock is
//! pure: callers feed it frame timestamps (or deltas) and apply the returned
//! index.

use std::time::Duration;

use serde::Serialize;

use crate::config::ViewerConfig;
use crate::timeseries::{TimeAxis, MIN_SPACING};

/// Speeds offered by the speed selector
pub const SPEED_OPTIONS: [f64; 6] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0];

/// Playback state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    /// Not advancing
    Paused,
    /// Advancing on every frame
    Playing,
}

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Clock is paused; nothing to do
    Idle,
    /// Playhead should show this sample; keep requesting frames
    Advanced {
        /// Sample under the cursor
        index: usize,
    },
    /// Reached the last sample and paused
    Finished {
        /// Last sample
        index: usize,
    },
}

/// Frame-driven virtual clock over a time axis
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: PlaybackState,
    cursor: f64,
    speed: f64,
    len: usize,
    average_spacing: f64,
    last_frame: Option<Duration>,
}

impl PlaybackClock {
    /// Create a paused clock for an axis
    pub fn new(axis: &TimeAxis) -> Self {
        Self {
            state: PlaybackState::Paused,
            cursor: 0.0,
            speed: 1.0,
            len: axis.len(),
            average_spacing: axis.average_spacing(),
            last_frame: None,
        }
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Fractional sample cursor
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Sample the cursor points at
    pub fn index(&self) -> usize {
        self.cursor.floor() as usize
    }

    /// Speed multiplier
    pub fn speed(&self) -> f64 {
        self.speed
    }

    fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// Start playing. Fails (returns `false`) on an empty axis.
    pub fn play(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.state = PlaybackState::Playing;
        self.last_frame = None;
        true
    }

    /// Stop playing and forget the frame baseline
    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
        self.last_frame = None;
    }

    /// Set the speed multiplier for subsequent frames
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = ViewerConfig::sanitize_speed(speed);
    }

    /// Jump the cursor to a sample (drops any fractional progress)
    pub fn sync_to(&mut self, index: usize) {
        self.cursor = index.min(self.last_index()) as f64;
    }

    /// Handle an animation frame at a monotonic timestamp.
    ///
    /// The first frame after [`play`](Self::play) only records the baseline.
    pub fn frame(&mut self, timestamp: Duration) -> FrameOutcome {
        if !self.is_playing() {
            return FrameOutcome::Idle;
        }
        let delta = match self.last_frame.replace(timestamp) {
            Some(previous) => timestamp.saturating_sub(previous).as_secs_f64(),
            None => 0.0,
        };
        self.advance(delta)
    }

    /// Advance by `delta_secs` of real time.
    ///
    /// The cursor moves `delta / average_spacing * speed` samples. Moving
    /// past the last sample clamps to it and pauses.
    pub fn advance(&mut self, delta_secs: f64) -> FrameOutcome {
        if !self.is_playing() {
            return FrameOutcome::Idle;
        }

        let step = if delta_secs <= 0.0 || !delta_secs.is_finite() {
            0.0
        } else if self.average_spacing > MIN_SPACING {
            delta_secs / self.average_spacing * self.speed
        } else {
            1.0
        };
        self.cursor += step;

        let last = self.last_index();
        if self.cursor > last as f64 {
            self.cursor = last as f64;
            self.pause();
            tracing::debug!(index = last, "playback reached end of data");
            return FrameOutcome::Finished { index: last };
        }

        FrameOutcome::Advanced {
            index: self.index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(len: usize) -> PlaybackClock {
        PlaybackClock::new(&TimeAxis::sample_index(len))
    }

    #[test]
    fn test_play_requires_samples() {
        let mut empty = clock(0);
        assert!(!empty.play());
        assert_eq!(empty.state(), PlaybackState::Paused);
        assert!(clock(1).play());
    }

    #[test]
    fn test_first_frame_is_sync() {
        let mut c = clock(10);
        c.play();
        assert_eq!(c.frame(Duration::from_secs(100)), FrameOutcome::Advanced { index: 0 });
        assert_eq!(c.cursor(), 0.0);
        assert_eq!(
            c.frame(Duration::from_millis(101_500)),
            FrameOutcome::Advanced { index: 1 }
        );
        assert_eq!(c.cursor(), 1.5);
    }

    #[test]
    fn test_half_second_frames_at_unit_spacing() {
        let mut c = clock(10);
        c.play();
        let indices: Vec<FrameOutcome> = (0..4).map(|_| c.advance(0.5)).collect();
        assert_eq!(
            indices,
            vec![
                FrameOutcome::Advanced { index: 0 },
                FrameOutcome::Advanced { index: 1 },
                FrameOutcome::Advanced { index: 1 },
                FrameOutcome::Advanced { index: 2 },
            ]
        );
    }

    #[test]
    fn test_speed_scales_step() {
        let mut c = clock(10);
        c.set_speed(4.0);
        c.play();
        assert_eq!(c.advance(0.5), FrameOutcome::Advanced { index: 2 });
        c.set_speed(-1.0);
        assert_eq!(c.speed(), 1.0);
    }

    #[test]
    fn test_end_of_data_pauses_once() {
        let mut c = clock(3);
        c.play();
        assert_eq!(c.advance(1.5), FrameOutcome::Advanced { index: 1 });
        assert_eq!(c.advance(1.5), FrameOutcome::Finished { index: 2 });
        assert_eq!(c.state(), PlaybackState::Paused);
        assert_eq!(c.cursor(), 2.0);
        assert_eq!(c.advance(1.5), FrameOutcome::Idle);
    }

    #[test]
    fn test_pause_resets_baseline() {
        let mut c = clock(100);
        c.play();
        c.frame(Duration::from_secs(1));
        c.frame(Duration::from_secs(2));
        c.pause();
        assert_eq!(c.frame(Duration::from_secs(3)), FrameOutcome::Idle);
        c.play();
        // Long gap while paused must not count as elapsed
        assert_eq!(c.frame(Duration::from_secs(50)), FrameOutcome::Advanced { index: 1 });
        assert_eq!(c.frame(Duration::from_secs(51)), FrameOutcome::Advanced { index: 2 });
    }

    #[test]
    fn test_sync_to_drops_fraction() {
        let mut c = clock(10);
        c.play();
        c.advance(0.7);
        c.sync_to(5);
        assert_eq!(c.cursor(), 5.0);
        c.sync_to(50);
        assert_eq!(c.cursor(), 9.0);
    }

    #[test]
    fn test_collapsed_axis_steps_one_sample() {
        let axis = TimeAxis::from_epoch_ms(&[Some(5.0), Some(5.0), Some(5.0)]);
        let mut c = PlaybackClock::new(&axis);
        c.play();
        assert_eq!(c.advance(0.01), FrameOutcome::Advanced { index: 1 });
    }
}
