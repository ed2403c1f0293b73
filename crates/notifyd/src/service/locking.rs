//! Scoped lock acquisition.

use std::sync::Arc;

use notifyd_core::lock::{LockHandle, LockManager, LockPolicy, Result};

/// A held lock that is released when the guard goes away.
///
/// Call [`release`](Self::release) on the normal path. If the guard is
/// dropped instead (an early return, a cancelled future, a panic), the release
/// is spawned onto the current runtime; failing that, the lease expires on its
/// own.
pub struct LockGuard {
    locks: Arc<dyn LockManager>,
    handle: Option<LockHandle>,
}

impl LockGuard {
    /// Acquires `key`, waiting at most `policy.wait`.
    pub async fn acquire(
        locks: Arc<dyn LockManager>,
        key: &str,
        policy: &LockPolicy,
    ) -> Result<Self> {
        let handle = locks.acquire(key, policy).await?;
        tracing::trace!(lock_key = %handle.key, "Lock acquired");

        Ok(Self {
            locks,
            handle: Some(handle),
        })
    }

    pub fn key(&self) -> &str {
        self.handle.as_ref().map(|h| h.key.as_str()).unwrap_or_default()
    }

    /// Releases the lock now.
    pub async fn release(mut self) {
        if let Some(handle) = self.handle.take() {
            release_logged(self.locks.as_ref(), &handle).await;
        }
    }
}

async fn release_logged(locks: &dyn LockManager, handle: &LockHandle) {
    match locks.release(handle).await {
        Ok(true) => tracing::trace!(lock_key = %handle.key, "Lock released"),
        Ok(false) => tracing::warn!(
            lock_key = %handle.key,
            lease = ?handle.lease,
            "Lock lease expired before release"
        ),
        Err(err) => tracing::warn!(
            lock_key = %handle.key,
            error = %err,
            "Failed to release lock, it will expire with its lease"
        ),
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let locks = Arc::clone(&self.locks);
                runtime.spawn(async move {
                    release_logged(locks.as_ref(), &handle).await;
                });
            }
            Err(_) => tracing::warn!(
                lock_key = %handle.key,
                "No runtime to release lock, it will expire with its lease"
            ),
        }
    }
}
