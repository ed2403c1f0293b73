//! Redis lease lock manager.
//!
//! A lock is a key holding the owner's token, set with `SET NX PX`. Release
//! and extend compare the stored token first so a holder whose lease already
//! expired cannot touch a lock that now belongs to someone else.

use std::time::Duration;

use async_trait::async_trait;
use redis::Script;

use notifyd_core::lock::{LockHandle, LockManager, Result};

use super::connect;
use super::error::map_redis_lock_error;

const RELEASE_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

const EXTEND_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('PEXPIRE', KEYS[1], ARGV[2])
end
return 0
"#;

/// Lock manager shared by every instance connected to the same Redis.
#[derive(Clone)]
pub struct RedisLockManager {
    conn: redis::aio::ConnectionManager,
    release: Script,
    extend: Script,
}

impl RedisLockManager {
    pub async fn new(url: &str) -> Result<Self> {
        let conn = connect(url).await.map_err(map_redis_lock_error)?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: redis::aio::ConnectionManager) -> Self {
        Self {
            conn,
            release: Script::new(RELEASE_SCRIPT),
            extend: Script::new(EXTEND_SCRIPT),
        }
    }
}

/// Redis rejects a zero PX.
fn lease_millis(lease: Duration) -> u64 {
    (lease.as_millis() as u64).max(1)
}

#[async_trait]
impl LockManager for RedisLockManager {
    async fn try_acquire(&self, key: &str, lease: Duration) -> Result<Option<LockHandle>> {
        let mut conn = self.conn.clone();
        let handle = LockHandle::new(key, lease);

        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(&handle.token)
            .arg("NX")
            .arg("PX")
            .arg(lease_millis(lease))
            .query_async(&mut conn)
            .await
            .map_err(map_redis_lock_error)?;

        Ok(reply.map(|_| handle))
    }

    async fn release(&self, handle: &LockHandle) -> Result<bool> {
        let mut conn = self.conn.clone();

        let deleted: i64 = self
            .release
            .key(&handle.key)
            .arg(&handle.token)
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_lock_error)?;

        Ok(deleted > 0)
    }

    async fn extend(&self, handle: &LockHandle, lease: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();

        let extended: i64 = self
            .extend
            .key(&handle.key)
            .arg(&handle.token)
            .arg(lease_millis(lease))
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_lock_error)?;

        Ok(extended > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::redis_impl::test_support::{redis_url, test_key};

    const LEASE: Duration = Duration::from_secs(5);

    /// Skip test if Redis not available.
    async fn get_test_locks() -> Option<RedisLockManager> {
        RedisLockManager::new(&redis_url()).await.ok()
    }

    #[test]
    fn test_lease_millis_never_zero() {
        assert_eq!(lease_millis(Duration::ZERO), 1);
        assert_eq!(lease_millis(Duration::from_secs(10)), 10_000);
    }

    #[tokio::test]
    async fn test_redis_acquire_and_release() {
        let Some(locks) = get_test_locks().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("lock");
        let handle = locks.try_acquire(&key, LEASE).await.unwrap().unwrap();
        assert!(locks.try_acquire(&key, LEASE).await.unwrap().is_none());

        assert!(locks.release(&handle).await.unwrap());
        let again = locks.try_acquire(&key, LEASE).await.unwrap().unwrap();
        locks.release(&again).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_release_by_non_holder() {
        let Some(locks) = get_test_locks().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("lock");
        let handle = locks.try_acquire(&key, LEASE).await.unwrap().unwrap();
        let impostor = LockHandle::new(key.clone(), LEASE);

        assert!(!locks.release(&impostor).await.unwrap());
        assert!(!locks.extend(&impostor, LEASE).await.unwrap());
        assert!(locks.try_acquire(&key, LEASE).await.unwrap().is_none());

        locks.release(&handle).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_lease_expires() {
        let Some(locks) = get_test_locks().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("lock");
        let stale = locks
            .try_acquire(&key, Duration::from_millis(100))
            .await
            .unwrap()
            .unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;

        let fresh = locks.try_acquire(&key, LEASE).await.unwrap().unwrap();
        assert!(!locks.release(&stale).await.unwrap());
        assert!(locks.extend(&fresh, LEASE).await.unwrap());
        assert!(locks.release(&fresh).await.unwrap());
    }
}
