//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use notifyd_core::notification::{NewNotification, Notification, NotificationId};
use notifyd_core::storage::{NotificationRepository, RepositoryError, Result};

const ENTITY: &str = "Notification";

/// In-memory storage backend.
///
/// Identities start at 1 and are never reused, even after a delete.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    notifications: Arc<RwLock<BTreeMap<NotificationId, Notification>>>,
    sequence: Arc<AtomicI64>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(RwLock::new(BTreeMap::new())),
            sequence: Arc::new(AtomicI64::new(0)),
        }
    }

    fn not_found(id: NotificationId) -> RepositoryError {
        RepositoryError::NotFound {
            entity_type: ENTITY,
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryRepository {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification> {
        let mut notifications = self.notifications.write().await;
        let id = NotificationId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1);
        let stored = notification.clone().into_notification(id);
        notifications.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, notification: &Notification) -> Result<Notification> {
        let mut notifications = self.notifications.write().await;
        let current = notifications
            .get_mut(&notification.id)
            .ok_or_else(|| Self::not_found(notification.id))?;
        current.apply_update(notification.subject.clone(), notification.content.clone());
        Ok(current.clone())
    }

    async fn find_by_id(&self, id: NotificationId) -> Result<Option<Notification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: NotificationId) -> Result<bool> {
        let notifications = self.notifications.read().await;
        Ok(notifications.contains_key(&id))
    }

    async fn delete_by_id(&self, id: NotificationId) -> Result<()> {
        let mut notifications = self.notifications.write().await;
        if notifications.remove(&id).is_none() {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let notifications = self.notifications.read().await;
        Ok(notifications.len() as u64)
    }
}
