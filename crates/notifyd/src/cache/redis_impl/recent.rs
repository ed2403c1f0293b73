//! Redis recent list.
//!
//! The list is a Redis LIST of JSON-encoded notifications, newest at index 0.
//! Push runs as a MULTI/EXEC pipeline; replace and remove run as Lua scripts
//! so the scan and the write happen in one server-side step.

use async_trait::async_trait;
use redis::{AsyncCommands, Script};

use notifyd_core::cache::{
    deserialize_notification, serialize_notification, RecentList, Result, RECENT_CAPACITY,
    RECENT_NOTIFICATIONS_KEY,
};
use notifyd_core::notification::{Notification, NotificationId};

use super::connect;
use super::error::map_redis_error;

/// Replaces the first entry whose decoded `id` equals ARGV[1] with ARGV[2].
const REPLACE_SCRIPT: &str = r#"
local items = redis.call('LRANGE', KEYS[1], 0, -1)
local wanted = tonumber(ARGV[1])
for i, raw in ipairs(items) do
    local ok, decoded = pcall(cjson.decode, raw)
    if ok and type(decoded) == 'table' and decoded['id'] == wanted then
        redis.call('LSET', KEYS[1], i - 1, ARGV[2])
        return 1
    end
end
return 0
"#;

/// Removes every entry whose decoded `id` equals ARGV[1].
///
/// Matches are overwritten with the tombstone in ARGV[2] and then dropped with
/// a single LREM, since LREM can only match by value.
const REMOVE_SCRIPT: &str = r#"
local items = redis.call('LRANGE', KEYS[1], 0, -1)
local wanted = tonumber(ARGV[1])
local marked = 0
for i, raw in ipairs(items) do
    local ok, decoded = pcall(cjson.decode, raw)
    if ok and type(decoded) == 'table' and decoded['id'] == wanted then
        redis.call('LSET', KEYS[1], i - 1, ARGV[2])
        marked = marked + 1
    end
end
if marked > 0 then
    redis.call('LREM', KEYS[1], 0, ARGV[2])
end
return marked
"#;

const TOMBSTONE: &str = "__notifyd_removed__";

/// Shared recent list stored in Redis.
#[derive(Clone)]
pub struct RedisRecentList {
    conn: redis::aio::ConnectionManager,
    key: String,
    capacity: usize,
    replace: Script,
    remove: Script,
}

impl RedisRecentList {
    /// Connects to `url` and uses the default list key and capacity.
    pub async fn new(url: &str) -> Result<Self> {
        let conn = connect(url).await.map_err(map_redis_error)?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an existing connection manager.
    pub fn from_connection(conn: redis::aio::ConnectionManager) -> Self {
        Self::with_key(conn, RECENT_NOTIFICATIONS_KEY, RECENT_CAPACITY)
    }

    /// Uses a custom list key and bound.
    pub fn with_key(
        conn: redis::aio::ConnectionManager,
        key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            conn,
            key: key.into(),
            capacity,
            replace: Script::new(REPLACE_SCRIPT),
            remove: Script::new(REMOVE_SCRIPT),
        }
    }
}

#[async_trait]
impl RecentList for RedisRecentList {
    async fn push_recent(&self, notification: &Notification) -> Result<()> {
        let mut conn = self.conn.clone();
        let bytes = serialize_notification(notification)?;
        let stop = self.capacity as isize - 1;

        let () = redis::pipe()
            .atomic()
            .lpush(&self.key, bytes)
            .ignore()
            .ltrim(&self.key, 0, stop)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<Notification>> {
        let mut conn = self.conn.clone();
        let raw: Vec<Vec<u8>> = conn
            .lrange(&self.key, 0, -1)
            .await
            .map_err(map_redis_error)?;

        let mut notifications = Vec::with_capacity(raw.len());
        for bytes in raw {
            notifications.push(deserialize_notification(&bytes)?);
        }
        Ok(notifications)
    }

    async fn update_recent_if_present(&self, notification: &Notification) -> Result<bool> {
        let mut conn = self.conn.clone();
        let bytes = serialize_notification(notification)?;

        let replaced: i64 = self
            .replace
            .key(&self.key)
            .arg(notification.id.value())
            .arg(bytes)
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(replaced > 0)
    }

    async fn remove_recent(&self, id: NotificationId) -> Result<bool> {
        let mut conn = self.conn.clone();

        let removed: i64 = self
            .remove
            .key(&self.key)
            .arg(id.value())
            .arg(TOMBSTONE)
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::redis_impl::test_support::{redis_url, test_key};
    use notifyd_core::notification::{NewNotification, NotificationType};

    /// Skip test if Redis not available. Each list gets its own key.
    async fn get_test_list() -> Option<RedisRecentList> {
        let conn = connect(&redis_url()).await.ok()?;
        Some(RedisRecentList::with_key(
            conn,
            test_key("recent"),
            RECENT_CAPACITY,
        ))
    }

    fn notification(id: i64) -> Notification {
        NewNotification::new(NotificationType::Email, "a@b.c", format!("s{id}"), "c")
            .into_notification(NotificationId::new(id))
    }

    fn ids(items: &[Notification]) -> Vec<i64> {
        items.iter().map(|n| n.id.value()).collect()
    }

    async fn cleanup(list: &RedisRecentList) {
        let mut conn = list.conn.clone();
        let _: redis::RedisResult<()> = conn.del(&list.key).await;
    }

    #[tokio::test]
    async fn test_redis_push_and_truncate() {
        let Some(list) = get_test_list().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        for id in 1..=12 {
            list.push_recent(&notification(id)).await.unwrap();
        }

        let items = list.list_recent().await.unwrap();
        assert_eq!(items.len(), RECENT_CAPACITY);
        assert_eq!(items[0].id.value(), 12);
        assert_eq!(items[9].id.value(), 3);

        cleanup(&list).await;
    }

    #[tokio::test]
    async fn test_redis_update_in_place() {
        let Some(list) = get_test_list().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        for id in 1..=3 {
            list.push_recent(&notification(id)).await.unwrap();
        }

        let mut changed = notification(2);
        changed.apply_update("changed", "changed");
        assert!(list.update_recent_if_present(&changed).await.unwrap());
        assert!(!list
            .update_recent_if_present(&notification(99))
            .await
            .unwrap());

        let items = list.list_recent().await.unwrap();
        assert_eq!(ids(&items), vec![3, 2, 1]);
        assert_eq!(items[1].subject, "changed");

        cleanup(&list).await;
    }

    #[tokio::test]
    async fn test_redis_remove() {
        let Some(list) = get_test_list().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        for id in 1..=3 {
            list.push_recent(&notification(id)).await.unwrap();
        }

        assert!(list.remove_recent(NotificationId::new(2)).await.unwrap());
        assert!(!list.remove_recent(NotificationId::new(2)).await.unwrap());
        assert_eq!(ids(&list.list_recent().await.unwrap()), vec![3, 1]);

        cleanup(&list).await;
    }
}
