use thiserror::Error;

use crate::lock::LockError;
use crate::notification::{NotificationError, NotificationId};
use crate::storage::RepositoryError;

/// Errors surfaced by the notification service.
///
/// Cache and publish failures are deliberately absent: they never fail an
/// operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Invalid notification type: {0}")]
    InvalidType(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Notification not found: {0}")]
    NotFound(NotificationId),
    #[error("Could not acquire lock {key} in time")]
    LockTimeout { key: String },
    #[error("Lock backend unavailable: {0}")]
    LockUnavailable(String),
    #[error("Record store failure: {0}")]
    Store(#[from] RepositoryError),
}

impl From<NotificationError> for ServiceError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::InvalidType(kind) => ServiceError::InvalidType(kind),
            other => ServiceError::InvalidRequest(other.to_string()),
        }
    }
}

impl From<LockError> for ServiceError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Timeout { key, .. } => ServiceError::LockTimeout { key },
            other => ServiceError::LockUnavailable(other.to_string()),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
