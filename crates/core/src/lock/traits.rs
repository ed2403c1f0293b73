use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{LockError, LockHandle, LockPolicy, Result};

/// Distributed mutual exclusion keyed by name, with a lease.
///
/// Locks are not reentrant: a second acquisition of a held key waits even
/// when it comes from the same task.
#[async_trait]
pub trait LockManager: Send + Sync {
    /// Makes a single attempt to take the lock. Returns `None` if it is held.
    async fn try_acquire(&self, key: &str, lease: Duration) -> Result<Option<LockHandle>>;

    /// Releases the lock if `handle` still owns it.
    ///
    /// Returns `false` when the lease had already expired (and the lock may
    /// now belong to another holder).
    async fn release(&self, handle: &LockHandle) -> Result<bool>;

    /// Renews the lease of a held lock. Returns `false` if `handle` no longer
    /// owns the lock.
    async fn extend(&self, handle: &LockHandle, lease: Duration) -> Result<bool>;

    /// Takes the lock, retrying until `policy.wait` elapses.
    async fn acquire(&self, key: &str, policy: &LockPolicy) -> Result<LockHandle> {
        let started = Instant::now();
        let deadline = started + policy.wait;

        loop {
            if let Some(handle) = self.try_acquire(key, policy.lease).await? {
                return Ok(handle);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(LockError::Timeout {
                    key: key.to_string(),
                    waited: now - started,
                });
            }

            tokio::time::sleep(policy.retry_interval.min(deadline - now)).await;
        }
    }
}
