//! In-memory lease lock manager.
//!
//! Locks live in a single map guarded by a mutex. Expired leases are not
//! swept; they are treated as free the next time someone looks at the key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use notifyd_core::lock::{LockHandle, LockManager, Result};

#[derive(Debug, Clone)]
struct Lease {
    token: String,
    expires_at: Instant,
}

impl Lease {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local lock manager.
///
/// Only coordinates tasks inside one process. Clones share the same lock
/// table.
#[derive(Debug, Clone, Default)]
pub struct MemoryLockManager {
    leases: Arc<Mutex<HashMap<String, Lease>>>,
}

impl MemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` is held by a lease that has not expired.
    pub async fn is_locked(&self, key: &str) -> bool {
        let leases = self.leases.lock().await;
        leases
            .get(key)
            .is_some_and(|lease| !lease.is_expired(Instant::now()))
    }

    /// Number of keys currently held by an unexpired lease.
    pub async fn held_count(&self) -> usize {
        let now = Instant::now();
        let leases = self.leases.lock().await;
        leases.values().filter(|lease| !lease.is_expired(now)).count()
    }
}

#[async_trait]
impl LockManager for MemoryLockManager {
    async fn try_acquire(&self, key: &str, lease: Duration) -> Result<Option<LockHandle>> {
        let mut leases = self.leases.lock().await;
        let now = Instant::now();

        if let Some(existing) = leases.get(key) {
            if !existing.is_expired(now) {
                return Ok(None);
            }
        }

        let handle = LockHandle::new(key, lease);
        leases.insert(
            key.to_string(),
            Lease {
                token: handle.token.clone(),
                expires_at: now + lease,
            },
        );

        Ok(Some(handle))
    }

    async fn release(&self, handle: &LockHandle) -> Result<bool> {
        let mut leases = self.leases.lock().await;

        match leases.get(&handle.key) {
            Some(lease) if lease.token == handle.token => {
                let still_valid = !lease.is_expired(Instant::now());
                leases.remove(&handle.key);
                Ok(still_valid)
            }
            _ => Ok(false),
        }
    }

    async fn extend(&self, handle: &LockHandle, lease: Duration) -> Result<bool> {
        let mut leases = self.leases.lock().await;
        let now = Instant::now();

        match leases.get_mut(&handle.key) {
            Some(current) if current.token == handle.token && !current.is_expired(now) => {
                current.expires_at = now + lease;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifyd_core::lock::{LockError, LockPolicy};

    const LEASE: Duration = Duration::from_secs(10);

    #[tokio::test(start_paused = true)]
    async fn test_held_count_ignores_released_and_expired() {
        let locks = MemoryLockManager::new();
        let a = locks.try_acquire("a", LEASE).await.unwrap().unwrap();
        locks.try_acquire("b", Duration::from_secs(1)).await.unwrap();
        assert_eq!(locks.held_count().await, 2);

        locks.release(&a).await.unwrap();
        assert_eq!(locks.held_count().await, 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(locks.held_count().await, 0);
    }

    #[tokio::test]
    async fn test_try_acquire_free_key() {
        let locks = MemoryLockManager::new();

        let handle = locks.try_acquire("k", LEASE).await.unwrap();

        assert!(handle.is_some());
        assert!(locks.is_locked("k").await);
    }

    #[tokio::test]
    async fn test_try_acquire_held_key_fails() {
        let locks = MemoryLockManager::new();
        let _held = locks.try_acquire("k", LEASE).await.unwrap().unwrap();

        assert!(locks.try_acquire("k", LEASE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_contend() {
        let locks = MemoryLockManager::new();
        let _a = locks.try_acquire("a", LEASE).await.unwrap().unwrap();

        assert!(locks.try_acquire("b", LEASE).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_release_frees_key() {
        let locks = MemoryLockManager::new();
        let handle = locks.try_acquire("k", LEASE).await.unwrap().unwrap();

        assert!(locks.release(&handle).await.unwrap());
        assert!(!locks.is_locked("k").await);
        assert!(locks.try_acquire("k", LEASE).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_release_by_non_holder_is_ignored() {
        let locks = MemoryLockManager::new();
        let _held = locks.try_acquire("k", LEASE).await.unwrap().unwrap();
        let impostor = LockHandle::new("k", LEASE);

        assert!(!locks.release(&impostor).await.unwrap());
        assert!(locks.is_locked("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_lease_can_be_taken_over() {
        let locks = MemoryLockManager::new();
        let stale = locks
            .try_acquire("k", Duration::from_millis(100))
            .await
            .unwrap()
            .unwrap();

        tokio::time::advance(Duration::from_millis(150)).await;

        let fresh = locks.try_acquire("k", LEASE).await.unwrap().unwrap();
        assert_ne!(stale.token, fresh.token);

        // The stale holder cannot release the new holder's lock.
        assert!(!locks.release(&stale).await.unwrap());
        assert!(locks.is_locked("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extend_keeps_lock_alive() {
        let locks = MemoryLockManager::new();
        let handle = locks
            .try_acquire("k", Duration::from_millis(100))
            .await
            .unwrap()
            .unwrap();

        tokio::time::advance(Duration::from_millis(80)).await;
        assert!(locks.extend(&handle, Duration::from_millis(100)).await.unwrap());

        tokio::time::advance(Duration::from_millis(80)).await;
        assert!(locks.is_locked("k").await);
        assert!(locks.try_acquire("k", LEASE).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_extend_after_expiry_fails() {
        let locks = MemoryLockManager::new();
        let handle = locks
            .try_acquire("k", Duration::from_millis(100))
            .await
            .unwrap()
            .unwrap();

        tokio::time::advance(Duration::from_millis(150)).await;

        assert!(!locks.extend(&handle, LEASE).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_waits_for_release() {
        let locks = MemoryLockManager::new();
        let held = locks.try_acquire("k", LEASE).await.unwrap().unwrap();

        let releaser = locks.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            releaser.release(&held).await.unwrap();
        });

        let policy = LockPolicy::new(LEASE, Duration::from_secs(1), Duration::from_millis(10));
        let handle = locks.acquire("k", &policy).await.unwrap();

        assert_eq!(handle.key, "k");
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_times_out() {
        let locks = MemoryLockManager::new();
        let _held = locks.try_acquire("k", LEASE).await.unwrap().unwrap();

        let policy = LockPolicy::new(LEASE, Duration::from_millis(300), Duration::from_millis(50));
        let result = locks.acquire("k", &policy).await;

        match result {
            Err(LockError::Timeout { key, waited }) => {
                assert_eq!(key, "k");
                assert!(waited >= Duration::from_millis(300));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
