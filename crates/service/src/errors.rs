use models::errors::ModelError;
use sea_orm::SqlErr;
use thiserror::Error;

/// Storage failures, classified so the service can tell client-correctable
/// conflicts apart from everything else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    UniqueViolation(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Other(String),
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => StoreError::Validation(msg),
            ModelError::Db(db) => match db.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::UniqueViolation(msg),
                _ => StoreError::Other(db.to_string()),
            },
        }
    }
}
