//! Sessions command - list recorded sessions, newest first.
//!
//! # Examples
//!
//! ```bash
//! tspweb --snapshot db.json sessions
//! tspweb sessions --json
//! ```

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use serde_json::json;
use tracing::instrument;

use tspweb_core::display::{format_epoch_ms, DASH};
use tspweb_core::store::TelemetryStore;

use crate::backend::Backend;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Only sessions that are still recording
    #[arg(long)]
    pub open: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[instrument(level = "info", name = "cmd::sessions", skip_all)]
pub async fn execute(backend: &Backend, args: &Args) -> Result<()> {
    let mut sessions = backend
        .list_sessions()
        .await
        .context("Failed to list sessions")?;
    sessions.retain(|(_, meta)| !args.open || meta.is_open());
    sessions.sort_by(|a, b| b.1.start_ms.cmp(&a.1.start_ms).then_with(|| a.0.cmp(&b.0)));

    if args.json {
        let list: Vec<_> = sessions
            .iter()
            .map(|(sid, meta)| json!({ "sid": sid, "meta": meta }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions.");
        return Ok(());
    }

    println!("{:<32}  {:<23}  {:<9}  SUMMARY", "SID", "START", "STATE");
    for (sid, meta) in &sessions {
        let start = meta.start_ms.map_or_else(|| DASH.to_string(), format_epoch_ms);
        let state = if meta.is_open() { "recording" } else { "closed" };
        println!("{sid:<32}  {start:<23}  {state:<9}  {}", meta.summary());
    }
    Ok(())
}
