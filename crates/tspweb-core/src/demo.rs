//! Demo Mode - Synthetic recorded sessions
//!
//! Generates a realistic chunked session log without a device: a resistive
//! load drawing a steady current on a mains supply, optionally with an arcing
//! burst where current drops out, harmonic distortion climbs and the spectrum
//! flattens.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::datalog::LogChunk;
use crate::session::{LabelOverride, SessionMeta};
use crate::store::{DatabaseSnapshot, MemoryStore};

/// Column header of a generated log
pub const DEMO_HEADER: &str =
    "timestamp,epoch_ms,session_id,load_type,spectral_entropy,thd_pct,zcv,v_rms,i_rms,temp_c,label_arc";

/// Shape of a generated session
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Session key
    pub session_id: String,
    /// Appliance name written to every row
    pub load_type: String,
    /// Epoch ms of the first sample
    pub start_ms: i64,
    /// Samples per second
    pub rate_hz: u32,
    /// Session length in seconds
    pub duration_s: u32,
    /// Rows per uploaded chunk
    pub rows_per_chunk: usize,
    /// Seconds into the session at which arcing begins, and how long it lasts
    pub arc_burst: Option<(f64, f64)>,
    /// RNG seed
    pub seed: u64,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            session_id: "demo_session".to_string(),
            load_type: "kettle".to_string(),
            start_ms: 1_767_225_600_000,
            rate_hz: 10,
            duration_s: 30,
            rows_per_chunk: 50,
            arc_burst: Some((12.0, 3.0)),
            seed: 42,
        }
    }
}

/// A generated session: metadata plus its uploaded chunks
#[derive(Debug, Clone)]
pub struct DemoSession {
    pub session_id: String,
    /// Session metadata
    pub meta: SessionMeta,
    /// Uploaded log chunks, oldest first
    pub chunks: Vec<LogChunk>,
}

impl DemoSession {
    /// Generate a session. The same options always produce the same data.
    pub fn generate(options: &DemoOptions) -> Self {
        let mut rng = StdRng::seed_from_u64(options.seed);
        let rate = options.rate_hz.max(1);
        let samples = (rate as usize) * (options.duration_s as usize);
        let step_ms = 1000.0 / rate as f64;
        let per_chunk = options.rows_per_chunk.max(1);

        let mut rows = Vec::with_capacity(samples);
        let mut temp_c = 24.0;
        for i in 0..samples {
            let t = i as f64 / rate as f64;
            let epoch_ms = options.start_ms + (i as f64 * step_ms).round() as i64;
            let arcing = options
                .arc_burst
                .is_some_and(|(at, len)| t >= at && t < at + len);

            let v_rms = 230.0 + rng.gen_range(-1.5..1.5);
            let (i_rms, thd, entropy) = if arcing {
                (
                    8.0 * rng.gen_range(0.55..0.95),
                    rng.gen_range(18.0..35.0),
                    rng.gen_range(0.75..0.95),
                )
            } else {
                (
                    8.0 + rng.gen_range(-0.1..0.1),
                    3.0 + rng.gen_range(-0.5..0.5),
                    0.30 + rng.gen_range(-0.05..0.05),
                )
            };
            temp_c += if arcing { 0.08 } else { 0.01 };
            let zcv = if arcing { rng.gen_range(0.2..1.5) } else { rng.gen_range(0.0..0.05) };

            rows.push(format!(
                "{},{},{},{},{:.6},{:.3},{:.3},{:.2},{:.3},{:.2},{}",
                iso_timestamp(epoch_ms),
                epoch_ms,
                options.session_id,
                options.load_type,
                entropy,
                thd,
                zcv,
                v_rms,
                i_rms,
                temp_c,
                u8::from(arcing)
            ));
        }

        let chunks = rows
            .chunks(per_chunk)
            .enumerate()
            .map(|(n, block)| {
                let mut csv = String::with_capacity(DEMO_HEADER.len() + block.len() * 96);
                csv.push_str(DEMO_HEADER);
                csv.push('\n');
                for row in block {
                    csv.push_str(row);
                    csv.push('\n');
                }
                let created_at =
                    (options.start_ms as f64 + ((n + 1) * per_chunk) as f64 * step_ms).round();
                LogChunk::new(format!("-demo{n:05}"), csv, created_at)
            })
            .collect::<Vec<_>>();

        let end_ms = options.start_ms + i64::from(options.duration_s) * 1000;
        let meta = SessionMeta {
            start_ms: Some(options.start_ms),
            end_ms: Some(end_ms),
            load_type: Some(options.load_type.clone()),
            duration_s: Some(f64::from(options.duration_s)),
            label_override: LabelOverride::Auto,
        };

        tracing::debug!(
            session = %options.session_id,
            samples,
            chunks = chunks.len(),
            "generated demo session"
        );

        Self {
            session_id: options.session_id.clone(),
            meta,
            chunks,
        }
    }

    /// Add this session to a memory store
    pub fn insert_into(&self, store: &mut MemoryStore) {
        store.insert_session(self.session_id.clone(), self.meta.clone());
        for chunk in &self.chunks {
            store.push_chunk(self.session_id.clone(), chunk.clone());
        }
    }

    /// Add this session to a database snapshot
    pub fn insert_into_snapshot(&self, snapshot: &mut DatabaseSnapshot) {
        snapshot
            .ml_sessions
            .insert(self.session_id.clone(), self.meta.clone());
        let logs: BTreeMap<String, LogChunk> = self
            .chunks
            .iter()
            .map(|c| (c.key.clone(), c.clone()))
            .collect();
        snapshot.ml_logs.insert(self.session_id.clone(), logs);
    }

    /// A snapshot holding only this session
    pub fn into_snapshot(self) -> DatabaseSnapshot {
        let mut snapshot = DatabaseSnapshot::default();
        self.insert_into_snapshot(&mut snapshot);
        snapshot
    }
}

fn iso_timestamp(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
