use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during lock operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("Lock backend connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Lock operation failed: {0}")]
    OperationFailed(String),
    #[error("Timed out after {waited:?} waiting for lock {key}")]
    Timeout { key: String, waited: Duration },
}

/// Result type for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;
