//! Pure functions for serializing/deserializing notifications to/from cache bytes.
//!
//! JSON keeps cache values human-readable and lets the Redis scripts that
//! maintain the recent list inspect the `id` field server-side.

use crate::notification::Notification;
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a notification to JSON bytes.
pub fn serialize_notification(notification: &Notification) -> Result<Vec<u8>> {
    serde_json::to_vec(notification).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a notification.
pub fn deserialize_notification(bytes: &[u8]) -> Result<Notification> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a slice of notifications to a JSON array.
pub fn serialize_notifications(notifications: &[Notification]) -> Result<Vec<u8>> {
    serde_json::to_vec(notifications)
        .map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes a JSON array to a vector of notifications.
pub fn deserialize_notifications(bytes: &[u8]) -> Result<Vec<Notification>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
