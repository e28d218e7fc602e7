//! Shared building blocks used across the workspace crates.
//! - `utils::logging` installs the tracing subscriber once per process.
//! - `event_log` is the injectable warn/error capability handed to components.
//! - `types` holds small wire types shared by binaries.

pub mod types;
pub mod utils;
pub mod event_log;

pub use event_log::{EventLog, RecordingEventLog, TracingEventLog};
