//! Inspect command - show the series and statistics of a session.
//!
//! # Examples
//!
//! ```bash
//! tspweb --snapshot db.json inspect demo_session
//!
//! # Readout at sample 120
//! tspweb --snapshot db.json inspect demo_session --at 120
//! ```

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use serde_json::json;
use tracing::instrument;

use tspweb_core::chart::YAxis;
use tspweb_core::config::ViewerConfig;
use tspweb_core::display::{format_value, DASH};
use tspweb_core::session::{load_session, Command};
use tspweb_core::timeseries::AxisKind;

use crate::backend::Backend;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Session id
    pub sid: String,

    /// Print the readout at this sample index
    #[arg(long, value_name = "INDEX")]
    pub at: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[instrument(level = "info", name = "cmd::inspect", skip_all, fields(sid = %args.sid))]
pub async fn execute(backend: &Backend, config: &ViewerConfig, args: &Args) -> Result<()> {
    let mut viewer = load_session(backend, &args.sid, config)
        .await
        .with_context(|| format!("Failed to load session {}", args.sid))?;
    if let Some(index) = args.at {
        viewer.apply(Command::Seek(index));
    }

    let model = viewer.model();
    let chart = viewer.chart();

    if args.json {
        let series: Vec<_> = chart
            .series()
            .iter()
            .zip(model.series())
            .map(|(state, data)| {
                json!({
                    "key": state.key,
                    "color": state.color,
                    "visible": state.visible,
                    "axis": state.axis,
                    "stats": data.stats(),
                })
            })
            .collect();
        let out = json!({
            "sid": viewer.session_id(),
            "meta": viewer.meta(),
            "rows": model.len(),
            "duration_s": model.axis().duration(),
            "series": series,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let axis = match model.axis().kind() {
        AxisKind::EpochSeconds => "seconds from first sample",
        AxisKind::SampleIndex => "sample index",
    };
    println!("Session: {}", viewer.session_id());
    println!("{}", viewer.meta().summary());
    println!("{}", viewer.status_line());
    println!("Axis: {axis}, span {}", format_value(Some(model.axis().duration())));
    println!();

    println!(
        "{:<24}  {:<4}  {:<7}  {:>10}  {:>10}  {:>10}  {:>5}",
        "SERIES", "AXIS", "VISIBLE", "MIN", "MAX", "MEAN", "NULLS"
    );
    for (state, data) in chart.series().iter().zip(model.series()) {
        let stats = data.stats();
        let axis = match state.axis {
            YAxis::Primary => "y",
            YAxis::Secondary => "y2",
        };
        let visible = if state.visible { "yes" } else { "" };
        println!(
            "{:<24}  {:<4}  {:<7}  {:>10}  {:>10}  {:>10}  {:>5}",
            state.key,
            axis,
            visible,
            format_value(stats.min),
            format_value(stats.max),
            format_value(stats.mean),
            stats.nulls
        );
    }

    let plan = viewer.render_plan();
    let range = |r: Option<(f64, f64)>| {
        r.map_or_else(
            || DASH.to_string(),
            |(lo, hi)| format!("[{}, {}]", format_value(Some(lo)), format_value(Some(hi))),
        )
    };
    println!();
    println!("y: {}  y2: {}", range(plan.primary_range), range(plan.secondary_range));

    if args.at.is_some() {
        println!("{}", viewer.value_readout());
    }
    Ok(())
}
