use thiserror::Error;

/// Errors that can occur when validating notification input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Invalid notification type: {0}")]
    InvalidType(String),
    #[error("Recipient cannot be empty")]
    EmptyRecipient,
    #[error("Invalid notification id: {0}")]
    InvalidId(String),
}
