use uuid::Uuid;

use crate::notification::NotificationId;

/// Returns the lock key guarding mutations of one notification.
///
/// Keyed by the record's identity so that every writer of the same record
/// contends on the same lock.
pub fn notification_lock_key(id: NotificationId) -> String {
    format!("notification-lock:{}", id)
}

/// Returns the lock key for a creation in flight.
///
/// No identity exists before the insert, so the key is a correlation id that
/// belongs to exactly one logical record.
pub fn creation_lock_key(correlation_id: Uuid) -> String {
    format!("notification-lock:create:{}", correlation_id)
}
