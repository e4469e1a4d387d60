//! # TSPweb Core Library
//!
//! Core functionality for the TSPweb telemetry viewer.
//!
//! This library provides:
//! - Reassembly of chunked CSV session logs
//! - A time-series model with per-series normalization
//! - Chart view state: zoom, pan, range selection, series toggles
//! - A playback clock that replays a session at a chosen speed
//! - Store adapters for the realtime database, snapshots and memory
//! - Live status monitoring and history export
//!
//! ## Example
//!
//! ```rust,ignore
//! use tspweb_core::prelude::*;
//!
//! let store = SnapshotStore::open("db.json".as_ref())?;
//! let mut viewer = load_session(&store, "20260101_120000", &ViewerConfig::default()).await?;
//!
//! viewer.apply(Command::Seek(100));
//! viewer.apply(Command::Play);
//! println!("{}", viewer.value_readout());
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod chart;
pub mod config;
pub mod datalog;
pub mod demo;
pub mod display;
pub mod live;
pub mod playback;
pub mod session;
pub mod store;
pub mod timeseries;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chart::{ChartController, PlotRect, PointerEvent, ViewWindow, YAxis};
    pub use crate::config::ViewerConfig;
    pub use crate::datalog::{reassemble, LogChunk, ReassembledCsv};
    pub use crate::live::{LiveMonitor, LiveRecord, StatusKind};
    pub use crate::playback::{PlaybackClock, PlaybackState};
    pub use crate::session::{
        load_session, Command, LoadError, SessionLoader, SessionMeta, SessionViewer,
    };
    pub use crate::store::{
        LiveFeed, MemoryStore, RestStore, SnapshotStore, StoreError, TelemetryStore,
    };
    pub use crate::timeseries::{Representation, TimeSeriesModel};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
