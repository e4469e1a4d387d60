mod backend;
mod commands;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tspweb_core::config::ViewerConfig;

use crate::backend::Backend;
use crate::commands::{demo, export, inspect, play, sessions, status};

/// Browse, export and replay recorded smart-plug sessions
#[derive(Parser)]
#[command(name = "tspweb")]
#[command(author, version)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # Create an offline database with one synthetic session
    tspweb demo -o db.json

    # List sessions in it
    tspweb --snapshot db.json sessions

    # Replay a session at 4x, keeping the playhead in view
    tspweb --snapshot db.json play demo_session --speed 4 --follow

    # Download a session log from the live database
    TSPWEB_DATABASE_URL=https://example-rtdb.firebaseio.com tspweb export <sid>
")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Viewer configuration file (defaults to the user config directory)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Read from a database export instead of the live database
    #[arg(long, value_name = "FILE", env = "TSPWEB_SNAPSHOT", global = true)]
    snapshot: Option<PathBuf>,

    /// Realtime database URL
    #[arg(long, env = "TSPWEB_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Database auth token
    #[arg(long, env = "TSPWEB_AUTH", hide_env_values = true, global = true)]
    auth: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recorded sessions
    Sessions(sessions::Args),

    /// Show the series and statistics of a session
    Inspect(inspect::Args),

    /// Write a session's reassembled CSV log
    Export(export::Args),

    /// Replay a session in the terminal
    Play(play::Args),

    /// Show live device status and recent history
    Status(status::Args),

    /// Generate a synthetic session snapshot
    Demo(demo::Args),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let open = || Backend::open(cli.snapshot.as_deref(), &config);

    match &cli.command {
        Commands::Demo(args) => demo::execute(args),
        Commands::Sessions(args) => runtime.block_on(sessions::execute(&open()?, args)),
        Commands::Inspect(args) => runtime.block_on(inspect::execute(&open()?, &config, args)),
        Commands::Export(args) => runtime.block_on(export::execute(&open()?, &config, args)),
        Commands::Play(args) => runtime.block_on(play::execute(&open()?, &config, args)),
        Commands::Status(args) => runtime.block_on(status::execute(&open()?, &config, args)),
    }
}

fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let path = cli.config.clone().or_else(ViewerConfig::default_path);
    let mut config = match path {
        Some(path) => ViewerConfig::load_or_default(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    if let Some(url) = &cli.database_url {
        config.database_url = Some(url.clone());
    }
    if let Some(auth) = &cli.auth {
        config.auth_token = Some(auth.clone());
    }
    Ok(config)
}

fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}
