//! The fixed JSON body every system role endpoint answers with:
//! `{hasError, message, data}` on success, `{hasError, message, error: {error}}` on failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use service::{ErrorDetail, Status};

pub const SUCCESS_MESSAGE: &str = "SUCCESS: Requested operation successful.";
pub const FAILURE_MESSAGE: &str = "ERROR: Requested operation failed.";
pub const NOT_FOUND_MESSAGE: &str = "ERROR: Requested operation failed. System role not found.";
pub const UNHANDLED_EXCEPTION: &str = "An unhandled exception occurred on the server.";

/// Envelope status to HTTP status, one to one.
pub fn status_code(status: Status) -> StatusCode {
    match status {
        Status::Success => StatusCode::OK,
        Status::Created => StatusCode::CREATED,
        Status::NotFound => StatusCode::NOT_FOUND,
        Status::Conflict => StatusCode::CONFLICT,
        Status::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Human readable message, fixed per status class.
pub fn message_for(status: Status) -> &'static str {
    match status {
        Status::Success | Status::Created => SUCCESS_MESSAGE,
        Status::NotFound => NOT_FOUND_MESSAGE,
        Status::Conflict | Status::ServerError => FAILURE_MESSAGE,
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody<D> {
    pub has_error: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug)]
pub struct ApiResponse<D> {
    pub status: StatusCode,
    pub body: ResponseBody<D>,
}

impl<D: Serialize> ApiResponse<D> {
    pub fn success(status: Status, data: D) -> Self {
        Self {
            status: status_code(status),
            body: ResponseBody { has_error: false, message: message_for(status), data: Some(data), error: None },
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(status: Status, error: &ErrorDetail) -> Self {
        Self {
            status: status_code(status),
            body: ResponseBody {
                has_error: true,
                message: message_for(status),
                data: None,
                error: Some(ErrorBody { error: error.message().to_string() }),
            },
        }
    }

    /// Catch-all 500. Carries no internal detail.
    pub fn unhandled() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ResponseBody {
                has_error: true,
                message: FAILURE_MESSAGE,
                data: None,
                error: Some(ErrorBody { error: UNHANDLED_EXCEPTION.to_string() }),
            },
        }
    }
}

impl<D: Serialize> IntoResponse for ApiResponse<D> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// `data` of single-record responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRoleData<T> {
    pub system_role: T,
}

/// `data` of the list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRoleListData<T> {
    pub total_system_roles: usize,
    pub system_roles: Vec<T>,
}
