use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use common::EventLog;

use crate::response::ApiResponse;

/// Failures raised in handler code outside the service envelope.
/// They are logged and answered with the generic 500.
#[derive(Debug, Error)]
pub enum HandlerFailure {
    #[error("actor identity missing from request context")]
    MissingActor,
    #[error("request body rejected: {0}")]
    Body(#[from] JsonRejection),
}

impl HandlerFailure {
    pub fn into_logged_response(self, log: &dyn EventLog, handler: &'static str) -> Response {
        log.error(&format!("ERROR @ {handler}"), Some(&self.to_string()));
        ApiResponse::unhandled().into_response()
    }
}

/// Bootstrap failures surfaced by [`crate::startup::run`].
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{event_log::Level, RecordingEventLog};

    #[test]
    fn logged_response_is_generic_and_logs_once() {
        let log = RecordingEventLog::new();
        let resp = HandlerFailure::MissingActor.into_logged_response(&log, "add_system_role");
        assert_eq!(resp.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, Level::Error);
        assert_eq!(entries[0].message, "ERROR @ add_system_role");
        assert!(entries[0].detail.as_deref().unwrap_or_default().contains("actor"));
    }
}
