use async_trait::async_trait;

use crate::notification::{NewNotification, Notification, NotificationId};

use super::Result;

/// Durable store for notification records: the source of truth.
///
/// A successful return from [`insert`](Self::insert), [`save`](Self::save) or
/// [`delete_by_id`](Self::delete_by_id) is the commit point of the write.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persists a new record, assigning its identity. Identities are never reused.
    async fn insert(&self, notification: &NewNotification) -> Result<Notification>;

    /// Persists the mutable fields of an existing record and returns the full
    /// current record.
    ///
    /// Fails with `NotFound` if the record no longer exists.
    async fn save(&self, notification: &Notification) -> Result<Notification>;

    /// Gets a record by its id.
    async fn find_by_id(&self, id: NotificationId) -> Result<Option<Notification>>;

    /// Returns true if a record with the given id exists.
    async fn exists_by_id(&self, id: NotificationId) -> Result<bool>;

    /// Deletes a record by its id.
    ///
    /// Fails with `NotFound` if the record does not exist.
    async fn delete_by_id(&self, id: NotificationId) -> Result<()>;

    /// Returns the number of stored records.
    async fn count(&self) -> Result<u64>;
}
