use std::time::Duration;

use async_trait::async_trait;

use crate::notification::{Notification, NotificationId};

use super::Result;

/// Trait for basic key/value cache operations.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// The bounded, newest-first list of recently created notifications.
///
/// The list lives in the cache backend, not in process memory, so several
/// service instances share it. Every method must be applied as one atomic
/// operation of the backend.
#[async_trait]
pub trait RecentList: Send + Sync {
    /// Inserts at the head and truncates to [`RECENT_CAPACITY`](super::RECENT_CAPACITY).
    async fn push_recent(&self, notification: &Notification) -> Result<()>;

    /// Returns the list, newest first.
    async fn list_recent(&self) -> Result<Vec<Notification>>;

    /// Replaces the entry with the same id in place, keeping its position.
    /// Returns `false` when no entry matched.
    async fn update_recent_if_present(&self, notification: &Notification) -> Result<bool>;

    /// Removes the entry with the given id. Returns `false` when no entry matched.
    async fn remove_recent(&self, id: NotificationId) -> Result<bool>;
}
