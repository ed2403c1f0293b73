//! Redis event publisher.
//!
//! Publishes each notification as a JSON message on a Redis channel named
//! after the topic.

use async_trait::async_trait;
use redis::AsyncCommands;

use notifyd_core::events::{EventPublisher, PublishError, Result};
use notifyd_core::notification::Notification;

use super::connect;
use super::error::map_redis_publish_error;

/// Redis pub/sub publisher.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: redis::aio::ConnectionManager,
}

impl RedisEventPublisher {
    pub async fn new(url: &str) -> Result<Self> {
        let conn = connect(url).await.map_err(map_redis_publish_error)?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: redis::aio::ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, topic: &str, notification: &Notification) -> Result<()> {
        let payload = serde_json::to_string(notification)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(topic, &payload)
            .await
            .map_err(map_redis_publish_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::redis_impl::test_support::{redis_url, test_key};
    use notifyd_core::notification::{NewNotification, NotificationId, NotificationType};

    #[tokio::test]
    async fn test_redis_publish_without_subscribers() {
        let Ok(publisher) = RedisEventPublisher::new(&redis_url()).await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let notification = NewNotification::new(NotificationType::Email, "a@b.c", "s", "c")
            .into_notification(NotificationId::new(1));

        let result = publisher
            .publish(&test_key("topic"), &notification)
            .await;

        assert!(result.is_ok());
    }
}
