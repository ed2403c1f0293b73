//! In-memory event publisher.
//!
//! Delivers published notifications to in-process subscribers using tokio
//! broadcast channels, one channel per topic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use notifyd_core::events::{EventPublisher, Result};
use notifyd_core::notification::Notification;

/// Channel capacity for each topic.
const CHANNEL_CAPACITY: usize = 100;

/// In-memory publisher.
///
/// Publishing to a topic nobody subscribes to succeeds and drops the message,
/// matching fire-and-forget broker semantics.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventPublisher {
    topics: Arc<RwLock<HashMap<String, broadcast::Sender<Notification>>>>,
}

impl MemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to all notifications published to `topic` from now on.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<Notification> {
        self.get_or_create_channel(topic).await.subscribe()
    }

    async fn get_or_create_channel(&self, topic: &str) -> broadcast::Sender<Notification> {
        {
            let topics = self.topics.read().await;
            if let Some(sender) = topics.get(topic) {
                return sender.clone();
            }
        }

        let mut topics = self.topics.write().await;

        // Double-check after acquiring write lock
        if let Some(sender) = topics.get(topic) {
            return sender.clone();
        }

        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        topics.insert(topic.to_string(), sender.clone());
        sender
    }
}

#[async_trait]
impl EventPublisher for MemoryEventPublisher {
    async fn publish(&self, topic: &str, notification: &Notification) -> Result<()> {
        let sender = self.get_or_create_channel(topic).await;

        // No receivers is not an error.
        let _ = sender.send(notification.clone());

        Ok(())
    }
}
