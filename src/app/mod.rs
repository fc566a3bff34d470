//! Application module
//!
//! Snapshots, the session registry and the state shared across windows.

pub mod config;
pub mod preferences;
pub mod registry;
mod state;

pub use config::{Action, SnipDelay};
pub use preferences::BorderColor;
pub use registry::{ReportRow, Snapshot, SnapshotId};
pub use state::AppState;
