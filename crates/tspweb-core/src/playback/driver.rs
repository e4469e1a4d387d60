//! Frame timer for playback
//!
//! Feeds [`Command::Frame`] into a viewer on a fixed tokio interval for as
//! long as the viewer keeps playing.

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::session::{Command, SessionViewer};

/// Default frame interval (~60 fps)
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Drive playback until the viewer pauses (end of data or a pause issued
/// from `on_frame`). Returns the number of frames delivered.
///
/// `on_frame` runs after every frame with the updated viewer and may issue
/// further commands.
pub async fn run_playback<F>(viewer: &mut SessionViewer, interval: Duration, mut on_frame: F) -> usize
where
    F: FnMut(&mut SessionViewer),
{
    if !viewer.is_playing() {
        return 0;
    }

    let start = Instant::now();
    let mut ticker = time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frames = 0;
    while viewer.is_playing() {
        let now = ticker.tick().await;
        viewer.apply(Command::Frame(now.duration_since(start)));
        frames += 1;
        on_frame(viewer);
    }

    tracing::debug!(frames, "playback driver stopped");
    frames
}
