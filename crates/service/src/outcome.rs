//! The result envelope returned by every persistence operation.
//!
//! Success-class variants carry data, failure-class variants carry an
//! [`ErrorDetail`]; the variant alone decides which one exists.

use std::fmt;

use serde::Serialize;

/// Closed set of outcome kinds shared with the HTTP layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Created,
    NotFound,
    Conflict,
    ServerError,
}

impl Status {
    pub fn is_failure(self) -> bool {
        matches!(self, Status::NotFound | Status::Conflict | Status::ServerError)
    }
}

/// Diagnostic payload of a failed operation. May contain backend detail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorDetail(String);

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Created(T),
    NotFound(ErrorDetail),
    Conflict(ErrorDetail),
    ServerError(ErrorDetail),
}

impl<T> Outcome<T> {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Success(_) => Status::Success,
            Outcome::Created(_) => Status::Created,
            Outcome::NotFound(_) => Status::NotFound,
            Outcome::Conflict(_) => Status::Conflict,
            Outcome::ServerError(_) => Status::ServerError,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Success(data) | Outcome::Created(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        match self {
            Outcome::NotFound(e) | Outcome::Conflict(e) | Outcome::ServerError(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Success(data) | Outcome::Created(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(data) => Outcome::Success(f(data)),
            Outcome::Created(data) => Outcome::Created(f(data)),
            Outcome::NotFound(e) => Outcome::NotFound(e),
            Outcome::Conflict(e) => Outcome::Conflict(e),
            Outcome::ServerError(e) => Outcome::ServerError(e),
        }
    }
}
