//! Playback
//!
//! Animates the session playhead: a pure virtual clock plus a thin async
//! frame driver.

mod clock;
mod driver;

pub use clock::{FrameOutcome, PlaybackClock, PlaybackState, SPEED_OPTIONS};
pub use driver::{run_playback, DEFAULT_FRAME_INTERVAL};
