//! Play command - replay a session in the terminal.
//!
//! Prints the readout line each time the playhead moves. Ctrl-C stops.
//!
//! # Examples
//!
//! ```bash
//! tspweb --snapshot db.json play demo_session --speed 4
//!
//! # Start at sample 200 with a 10 s window that follows the playhead
//! tspweb --snapshot db.json play demo_session --from 200 --window 10 --follow
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use tspweb_core::config::ViewerConfig;
use tspweb_core::display::format_value;
use tspweb_core::playback::{run_playback, SPEED_OPTIONS};
use tspweb_core::session::{load_session, Command, SessionViewer};

use crate::backend::Backend;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Session id
    pub sid: String,

    /// Speed multiplier (0.25, 0.5, 1, 2, 4, 8, or any positive value)
    #[arg(long, value_parser = parse_speed)]
    pub speed: Option<f64>,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Keep the view window around the playhead
    #[arg(long)]
    pub follow: bool,

    /// Start at this sample index
    #[arg(long, value_name = "INDEX", default_value_t = 0)]
    pub from: usize,

    /// Width of the view window in axis units
    #[arg(long, value_name = "WIDTH")]
    pub window: Option<f64>,
}

fn speed_list() -> String {
    SPEED_OPTIONS
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse `--speed`; any positive finite multiplier is accepted
fn parse_speed(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(speed) if speed.is_finite() && speed > 0.0 => {
            if !SPEED_OPTIONS.contains(&speed) {
                tracing::info!(speed, offered = %speed_list(), "using a speed outside the usual options");
            }
            Ok(speed)
        }
        _ => Err(format!("expected a positive multiplier such as {}", speed_list())),
    }
}

#[instrument(level = "info", name = "cmd::play", skip_all, fields(sid = %args.sid))]
pub async fn execute(backend: &Backend, config: &ViewerConfig, args: &Args) -> Result<()> {
    let mut viewer = load_session(backend, &args.sid, config)
        .await
        .with_context(|| format!("Failed to load session {}", args.sid))?;

    viewer.apply(Command::Seek(args.from));
    if let Some(width) = args.window {
        let start = viewer.model().axis().value_at(viewer.playhead()).unwrap_or(0.0);
        viewer.apply(Command::SetViewWindow {
            min: start,
            max: start + width,
        });
    }
    if let Some(speed) = args.speed {
        viewer.apply(Command::SetSpeed(speed));
    }
    viewer.apply(Command::SetFollow(args.follow));

    println!("{}", viewer.status_line());
    print_frame(&viewer, args.follow);

    let interval = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let mut last = viewer.playhead();
    viewer.apply(Command::Play);

    let finished = {
        let playback = run_playback(&mut viewer, interval, |v| {
            if v.playhead() != last {
                last = v.playhead();
                print_frame(v, args.follow);
            }
        });
        tokio::select! {
            frames = playback => {
                tracing::debug!(frames, "playback finished");
                true
            }
            _ = tokio::signal::ctrl_c() => false,
        }
    };

    if !finished {
        viewer.apply(Command::Pause);
        eprintln!("Stopped at idx={}", viewer.playhead());
    }
    Ok(())
}

fn print_frame(viewer: &SessionViewer, follow: bool) {
    if follow {
        let window = viewer.chart().window();
        println!(
            "{}  |  view=[{}, {}]",
            viewer.value_readout(),
            format_value(Some(window.min)),
            format_value(Some(window.max))
        );
    } else {
        println!("{}", viewer.value_readout());
    }
}
