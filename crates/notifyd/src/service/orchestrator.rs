//! The notification service.
//!
//! Composes the record store, the cache, the recent list, the lock manager
//! and the event dispatcher into the five public operations.
//!
//! Ordering for every write: lock, durable commit, then side effects, then
//! unlock. Only the commit can fail the operation. Cache and event failures
//! are logged and swallowed, and the cache is never treated as authoritative.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use uuid::Uuid;

use notifyd_core::cache::{
    deserialize_notification, notification_key, serialize_notification, Cache, RecentList,
};
use notifyd_core::lock::{creation_lock_key, notification_lock_key, LockManager, LockPolicy};
use notifyd_core::notification::{
    CreateNotificationRequest, Notification, NotificationId, UpdateNotificationRequest,
};
use notifyd_core::service::{Result, ServiceError};
use notifyd_core::storage::{NotificationRepository, RepositoryError};

use super::dispatcher::EventDispatcher;
use super::locking::LockGuard;

/// Tunables for [`NotificationService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    pub lock_policy: LockPolicy,
    /// Expiry of per-id cache entries. `None` keeps them until evicted.
    pub cache_ttl: Option<Duration>,
    /// Delay of the second eviction that follows every update and delete.
    /// It clears entries written back by readers that fetched the record
    /// before the commit.
    pub reevict_delay: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            lock_policy: LockPolicy::default(),
            cache_ttl: Some(Duration::from_secs(300)),
            reevict_delay: Duration::from_secs(1),
        }
    }
}

/// Orchestrates create/read/update/delete across the stores.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
    cache: Arc<dyn Cache>,
    recent: Arc<dyn RecentList>,
    locks: Arc<dyn LockManager>,
    events: EventDispatcher,
    options: ServiceOptions,
}

impl NotificationService {
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        cache: Arc<dyn Cache>,
        recent: Arc<dyn RecentList>,
        locks: Arc<dyn LockManager>,
        events: EventDispatcher,
        options: ServiceOptions,
    ) -> Self {
        Self {
            repository,
            cache,
            recent,
            locks,
            events,
            options,
        }
    }

    /// Creates a notification.
    ///
    /// The request is validated before any lock or store is touched.
    pub async fn create(&self, request: &CreateNotificationRequest) -> Result<Notification> {
        let draft = request.validate()?;

        let guard = self.lock(&creation_lock_key(Uuid::new_v4())).await?;
        let draft = draft.with_created_at(Local::now().naive_local());
        let saved = match self.repository.insert(&draft).await {
            Ok(saved) => saved,
            Err(err) => {
                guard.release().await;
                return Err(err.into());
            }
        };
        tracing::debug!(notification_id = %saved.id, kind = %saved.kind, "Notification created");

        self.events.enqueue(&saved);

        if let Err(err) = self.recent.push_recent(&saved).await {
            tracing::warn!(notification_id = %saved.id, error = %err, "Failed to push to recent list");
        }
        self.cache_put(&saved).await;

        guard.release().await;
        Ok(saved)
    }

    /// Looks a notification up, cache first.
    pub async fn get_by_id(&self, id: NotificationId) -> Result<Notification> {
        let cache_key = notification_key(id);

        match self.cache.get(&cache_key).await {
            Ok(Some(bytes)) => match deserialize_notification(&bytes) {
                Ok(notification) => {
                    tracing::trace!(notification_id = %id, "Cache hit for notification");
                    return Ok(notification);
                }
                // Deserialization failed - treat as cache miss
                Err(err) => {
                    tracing::warn!(notification_id = %id, error = %err, "Cached notification is unreadable");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(notification_id = %id, error = %err, "Cache read failed");
            }
        }

        tracing::trace!(notification_id = %id, "Cache miss for notification");
        let notification = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        self.cache_put(&notification).await;
        Ok(notification)
    }

    /// Returns the most recently created notifications, newest first.
    ///
    /// Never falls back to the record store: an unavailable cache yields an
    /// empty list.
    pub async fn get_recent(&self) -> Vec<Notification> {
        match self.recent.list_recent().await {
            Ok(recent) => recent,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read recent list");
                Vec::new()
            }
        }
    }

    /// Changes the subject and content of an existing notification.
    pub async fn update(
        &self,
        id: NotificationId,
        request: &UpdateNotificationRequest,
    ) -> Result<Notification> {
        let mut existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let guard = self.lock(&notification_lock_key(id)).await?;

        existing.apply_update(request.subject.clone(), request.content.clone());
        let updated = match self.repository.save(&existing).await {
            Ok(updated) => updated,
            Err(err) => {
                guard.release().await;
                return Err(not_found_or(id, err));
            }
        };
        tracing::debug!(notification_id = %id, "Notification updated");

        self.cache_refresh_if_present(&updated).await;
        self.schedule_eviction(id);
        if let Err(err) = self.recent.update_recent_if_present(&updated).await {
            tracing::warn!(notification_id = %id, error = %err, "Failed to update recent list");
        }

        guard.release().await;
        Ok(updated)
    }

    /// Deletes a notification and drops it from the cache and recent list.
    pub async fn delete(&self, id: NotificationId) -> Result<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(ServiceError::NotFound(id));
        }

        let guard = self.lock(&notification_lock_key(id)).await?;

        if let Err(err) = self.repository.delete_by_id(id).await {
            guard.release().await;
            return Err(not_found_or(id, err));
        }
        tracing::debug!(notification_id = %id, "Notification deleted");

        if let Err(err) = self.cache.delete(&notification_key(id)).await {
            tracing::warn!(notification_id = %id, error = %err, "Failed to evict notification");
        }
        self.schedule_eviction(id);
        if let Err(err) = self.recent.remove_recent(id).await {
            tracing::warn!(notification_id = %id, error = %err, "Failed to remove from recent list");
        }

        guard.release().await;
        Ok(())
    }

    /// Waits until every event queued so far has been attempted.
    pub async fn flush_events(&self) {
        self.events.flush().await;
    }

    /// Drains pending events and stops the dispatcher.
    pub async fn shutdown(&self) {
        self.events.shutdown().await;
    }

    async fn lock(&self, key: &str) -> Result<LockGuard> {
        LockGuard::acquire(Arc::clone(&self.locks), key, &self.options.lock_policy)
            .await
            .map_err(|err| {
                tracing::warn!(lock_key = %key, error = %err, "Could not acquire lock");
                ServiceError::from(err)
            })
    }

    async fn cache_put(&self, notification: &Notification) {
        let bytes = match serialize_notification(notification) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(notification_id = %notification.id, error = %err, "Failed to serialize notification");
                return;
            }
        };

        if let Err(err) = self
            .cache
            .set(&notification_key(notification.id), &bytes, self.options.cache_ttl)
            .await
        {
            tracing::warn!(notification_id = %notification.id, error = %err, "Failed to cache notification");
        }
    }

    /// Overwrites the per-id entry only if one is cached. A miss stays a miss.
    async fn cache_refresh_if_present(&self, notification: &Notification) {
        let cache_key = notification_key(notification.id);

        match self.cache.get(&cache_key).await {
            Ok(Some(_)) => self.cache_put(notification).await,
            Ok(None) => {}
            Err(err) => {
                // Unknown state: drop whatever might be there rather than leave it stale.
                tracing::warn!(notification_id = %notification.id, error = %err, "Cache read failed, evicting");
                if let Err(err) = self.cache.delete(&cache_key).await {
                    tracing::warn!(notification_id = %notification.id, error = %err, "Failed to evict notification");
                }
            }
        }
    }

    /// Evicts `id` again once `reevict_delay` has passed.
    fn schedule_eviction(&self, id: NotificationId) {
        let cache = Arc::clone(&self.cache);
        let delay = self.options.reevict_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = cache.delete(&notification_key(id)).await {
                tracing::warn!(notification_id = %id, error = %err, "Delayed eviction failed");
            }
        });
    }
}

/// A record that vanished between the existence check and the write is
/// reported as not found.
fn not_found_or(id: NotificationId, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound { .. } => ServiceError::NotFound(id),
        other => ServiceError::Store(other),
    }
}
