use crate::notification::NotificationId;

/// Key of the shared list holding the most recently created notifications.
pub const RECENT_NOTIFICATIONS_KEY: &str = "recent_notifications";

/// Maximum number of entries kept in the recent list.
pub const RECENT_CAPACITY: usize = 10;

/// Returns the cache key for a single notification.
pub fn notification_key(id: NotificationId) -> String {
    format!("notification:{}", id)
}
