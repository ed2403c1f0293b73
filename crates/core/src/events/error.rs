use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while publishing an event.
///
/// Publishing is best effort: these are logged and never undo the write that
/// produced the event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Publisher connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Publish failed: {0}")]
    PublishFailed(String),
    #[error("Publish timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;
