use async_trait::async_trait;

use crate::notification::Notification;

use super::Result;

/// Topic that downstream delivery workers consume.
pub const NOTIFICATION_TOPIC: &str = "notification-topic";

/// Publishes committed notifications to an external topic.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes the full record to `topic`.
    async fn publish(&self, topic: &str, notification: &Notification) -> Result<()>;
}
