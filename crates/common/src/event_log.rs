//! Injectable diagnostic sink.
//!
//! Components receive an `Arc<dyn EventLog>` instead of calling a global
//! logger, so tests can swap in [`RecordingEventLog`] and count entries.

use std::sync::Mutex;

/// Warn/error capability handed to services and handlers.
pub trait EventLog: Send + Sync {
    fn warn(&self, message: &str);
    fn error(&self, message: &str, detail: Option<&str>);
}

/// Forwards every entry to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn warn(&self, message: &str) {
        tracing::warn!(event = "diagnostic", "{message}");
    }

    fn error(&self, message: &str, detail: Option<&str>) {
        match detail {
            Some(detail) => tracing::error!(event = "diagnostic", detail = %detail, "{message}"),
            None => tracing::error!(event = "diagnostic", "{message}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Warn,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub level: Level,
    pub message: String,
    pub detail: Option<String>,
}

/// Keeps entries in memory; used by tests to assert on emitted diagnostics.
#[derive(Debug, Default)]
pub struct RecordingEventLog {
    entries: Mutex<Vec<Entry>>,
}

impl RecordingEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.entries().iter().filter(|e| e.level == level).count()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn push(&self, entry: Entry) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).push(entry);
    }
}

impl EventLog for RecordingEventLog {
    fn warn(&self, message: &str) {
        self.push(Entry { level: Level::Warn, message: message.to_string(), detail: None });
    }

    fn error(&self, message: &str, detail: Option<&str>) {
        self.push(Entry {
            level: Level::Error,
            message: message.to_string(),
            detail: detail.map(str::to_string),
        });
    }
}
