//! Status command - live device status and recent history.
//!
//! # Examples
//!
//! ```bash
//! tspweb status
//!
//! # Only arcing events, exported as CSV
//! tspweb status --only arcing --csv arcs.csv
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args as ClapArgs, ValueEnum};
use tracing::instrument;

use tspweb_core::config::ViewerConfig;
use tspweb_core::live::{
    filter_by_kind, freshest, latest_first, time_text, write_history_csv, LiveMonitor, StatusKind,
};
use tspweb_core::store::LiveFeed;

use crate::backend::Backend;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindFilter {
    Ok,
    Warning,
    Arcing,
    Disconnected,
}

impl From<KindFilter> for StatusKind {
    fn from(kind: KindFilter) -> Self {
        match kind {
            KindFilter::Ok => StatusKind::Ok,
            KindFilter::Warning => StatusKind::Warning,
            KindFilter::Arcing => StatusKind::Arcing,
            KindFilter::Disconnected => StatusKind::Disconnected,
        }
    }
}

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Number of history records to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only history records of this kind
    #[arg(long, value_enum)]
    pub only: Option<KindFilter>,

    /// Also write the listed history to a CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}

#[instrument(level = "info", name = "cmd::status", skip_all)]
pub async fn execute(backend: &Backend, config: &ViewerConfig, args: &Args) -> Result<()> {
    let limit = args.limit.unwrap_or(config.history_limit);
    let live = backend.read_live().await.context("Failed to read live data")?;
    let history = latest_first(
        backend
            .read_history(limit)
            .await
            .context("Failed to read history")?,
        limit,
    );

    let now_ms = Utc::now().timestamp_millis();
    let mut monitor = LiveMonitor::from_config(config);
    if let Some(record) = freshest(live.as_ref(), &history) {
        // A record's own clock stands in for the receive time.
        let seen_ms = record.sort_key() as i64;
        monitor.on_live(record.clone(), if seen_ms > 0 { seen_ms } else { now_ms });
    }
    monitor.tick(now_ms);

    println!("Status: {} ({})", monitor.label(), monitor.status());
    println!("Last update: {}", monitor.last_update_text());
    if let Some(record) = monitor.latest() {
        let [v, i, t, zcv, thd, ent] = record.formatted_values();
        println!("V={v}  I={i}  T={t}  ZCV={zcv}  THD={thd}  H={ent}");
    }
    println!();

    let listed: Vec<_> = match args.only {
        Some(kind) => filter_by_kind(&history, kind.into())
            .into_iter()
            .cloned()
            .collect(),
        None => history,
    };

    if listed.is_empty() {
        println!("No history yet.");
    } else {
        println!(
            "{:<24}  {:<14}  {:>7}  {:>6}  {:>6}  {:>6}  {:>6}  {:>7}",
            "TIME", "STATUS", "V", "I", "TEMP", "ZCV", "THD", "ENTROPY"
        );
        for record in &listed {
            let [v, i, t, zcv, thd, ent] = record.formatted_values();
            println!(
                "{:<24}  {:<14}  {v:>7}  {i:>6}  {t:>6}  {zcv:>6}  {thd:>6}  {ent:>7}",
                time_text(record),
                record.status.as_deref().unwrap_or(""),
            );
        }
    }

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_history_csv(BufWriter::new(file), &listed)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote {} records to {}", listed.len(), path.display());
    }
    Ok(())
}
