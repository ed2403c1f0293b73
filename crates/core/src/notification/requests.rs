//! Request types for notification operations.
//!
//! These are the shapes an upstream transport layer hands to the service.
//! `CreateNotificationRequest::kind` stays a raw string so that the enumerated
//! type constraint is checked in exactly one place: [`CreateNotificationRequest::validate`].

use serde::{Deserialize, Serialize};

use super::{NewNotification, NotificationError, NotificationType};

/// Request payload for creating a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

impl CreateNotificationRequest {
    pub fn new(
        kind: impl Into<String>,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            recipient: recipient.into(),
            subject: subject.into(),
            content: content.into(),
        }
    }

    /// Validates the request.
    ///
    /// The draft is stamped with the current local time. The service restamps
    /// it once the creation lock is held.
    pub fn validate(&self) -> Result<NewNotification, NotificationError> {
        let kind: NotificationType = self.kind.parse()?;

        if self.recipient.trim().is_empty() {
            return Err(NotificationError::EmptyRecipient);
        }

        Ok(NewNotification::new(
            kind,
            self.recipient.clone(),
            self.subject.clone(),
            self.content.clone(),
        ))
    }
}

/// Request payload for updating a notification. Only the subject and the
/// content can change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNotificationRequest {
    pub subject: String,
    pub content: String,
}

impl UpdateNotificationRequest {
    pub fn new(subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            content: content.into(),
        }
    }
}
