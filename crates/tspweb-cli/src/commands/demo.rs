//! Demo command - generate a synthetic session snapshot.
//!
//! # Examples
//!
//! ```bash
//! tspweb demo -o db.json
//! tspweb demo -o db.json --sid lamp_test --load lamp --duration 120 --no-arc
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use tspweb_core::demo::{DemoOptions, DemoSession};
use tspweb_core::store::DatabaseSnapshot;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Snapshot file to write; an existing snapshot gains the new session
    #[arg(short, long, value_name = "FILE", default_value = "tspweb-demo.json")]
    pub output: PathBuf,

    /// Session id
    #[arg(long, default_value = "demo_session")]
    pub sid: String,

    /// Load type label
    #[arg(long, default_value = "kettle")]
    pub load: String,

    /// Session length in seconds
    #[arg(long, default_value_t = 30)]
    pub duration: u32,

    /// Samples per second
    #[arg(long, default_value_t = 10)]
    pub rate: u32,

    /// Rows per uploaded chunk
    #[arg(long, default_value_t = 50)]
    pub chunk_rows: usize,

    /// Leave out the arcing burst
    #[arg(long)]
    pub no_arc: bool,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[instrument(level = "info", name = "cmd::demo", skip_all)]
pub fn execute(args: &Args) -> Result<()> {
    let duration = f64::from(args.duration);
    let options = DemoOptions {
        session_id: args.sid.clone(),
        load_type: args.load.clone(),
        rate_hz: args.rate,
        duration_s: args.duration,
        rows_per_chunk: args.chunk_rows,
        arc_burst: (!args.no_arc).then_some((duration * 0.4, (duration * 0.1).max(1.0))),
        seed: args.seed,
        ..Default::default()
    };
    let session = DemoSession::generate(&options);

    let mut snapshot = if args.output.exists() {
        DatabaseSnapshot::load(&args.output)
            .with_context(|| format!("Failed to read {}", args.output.display()))?
    } else {
        DatabaseSnapshot::default()
    };
    session.insert_into_snapshot(&mut snapshot);
    snapshot
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    eprintln!(
        "Wrote session {} ({} chunks) to {}",
        session.session_id,
        session.chunks.len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(output: PathBuf, sid: &str) -> Args {
        Args {
            output,
            sid: sid.to_string(),
            load: "lamp".to_string(),
            duration: 4,
            rate: 5,
            chunk_rows: 6,
            no_arc: true,
            seed: 1,
        }
    }

    #[test]
    fn test_demo_appends_to_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        execute(&args(path.clone(), "first")).unwrap();
        execute(&args(path.clone(), "second")).unwrap();

        let snapshot = DatabaseSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.ml_sessions.len(), 2);
        assert_eq!(snapshot.ml_logs["second"].len(), 4);
    }
}
