//! Session Viewer
//!
//! Opening a recorded session and driving its chart and playback.

mod command;
mod error;
mod loader;
mod meta;
mod viewer;

pub use command::Command;
pub use error::LoadError;
pub use loader::{load_session, LoadResult, LoadTicket, SessionLoader};
pub use meta::{LabelOverride, SessionMeta};
pub use viewer::SessionViewer;
