use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::NotificationError;

/// Store-assigned identity of a notification record.
///
/// Identifiers are handed out by the record store on first insert and are
/// never reused, even after the record is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(i64);

impl NotificationId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NotificationId {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| NotificationError::InvalidId(s.to_string()))
    }
}

/// Delivery channel of a notification. Closed set: anything else is rejected
/// at the single parsing point below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Email,
    Sms,
}

impl NotificationType {
    /// Every accepted notification type.
    pub const ALL: [NotificationType; 2] = [NotificationType::Email, NotificationType::Sms];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Email => "email",
            NotificationType::Sms => "sms",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = NotificationError;

    /// Matching is exact: `"Email"` or `" sms"` are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(NotificationType::Email),
            "sms" => Ok(NotificationType::Sms),
            other => Err(NotificationError::InvalidType(other.to_string())),
        }
    }
}

/// A persisted notification record.
///
/// `created_at` is a local date-time serialized as ISO-8601 without offset
/// (e.g. `2024-06-15T10:30:00`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub recipient: String,
    pub subject: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl Notification {
    /// Replaces the mutable fields. Identity, type, recipient and creation
    /// time are fixed once the record exists.
    pub fn apply_update(&mut self, subject: impl Into<String>, content: impl Into<String>) {
        self.subject = subject.into();
        self.content = content.into();
    }
}

/// A validated notification that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationType,
    pub recipient: String,
    pub subject: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl NewNotification {
    /// Creates a new record stamped with the current local time.
    pub fn new(
        kind: NotificationType,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            recipient: recipient.into(),
            subject: subject.into(),
            content: content.into(),
            created_at: Local::now().naive_local(),
        }
    }

    /// Replaces the creation time.
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Attaches the store-assigned identity.
    pub fn into_notification(self, id: NotificationId) -> Notification {
        Notification {
            id,
            kind: self.kind,
            recipient: self.recipient,
            subject: self.subject,
            content: self.content,
            created_at: self.created_at,
        }
    }
}
