//! Export command - write a session's reassembled CSV log.
//!
//! # Examples
//!
//! ```bash
//! # Writes TSP_ML_<sid>.csv in the current directory
//! tspweb export 20260101_120000
//!
//! # To stdout
//! tspweb export 20260101_120000 -o -
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use tspweb_core::config::ViewerConfig;
use tspweb_core::datalog::write_csv;
use tspweb_core::session::load_session;

use crate::backend::Backend;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Session id
    pub sid: String,

    /// Output file, or `-` for stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[instrument(level = "info", name = "cmd::export", skip_all, fields(sid = %args.sid))]
pub async fn execute(backend: &Backend, config: &ViewerConfig, args: &Args) -> Result<()> {
    let viewer = load_session(backend, &args.sid, config)
        .await
        .with_context(|| format!("Failed to load session {}", args.sid))?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(viewer.export_file_name()));

    if path.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(viewer.export_csv().as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    write_csv(&path, viewer.csv()).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Wrote {} rows to {}", viewer.csv().row_count(), path.display());
    Ok(())
}
