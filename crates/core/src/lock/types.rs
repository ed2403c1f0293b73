use std::time::Duration;

use uuid::Uuid;

/// How long a lock is held and how long a caller waits to get it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    /// Lease after which an unreleased lock expires on its own.
    pub lease: Duration,
    /// Upper bound on the time spent waiting for a contended lock.
    pub wait: Duration,
    /// Pause between acquisition attempts.
    pub retry_interval: Duration,
}

impl LockPolicy {
    pub fn new(lease: Duration, wait: Duration, retry_interval: Duration) -> Self {
        Self {
            lease,
            wait,
            retry_interval,
        }
    }
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            lease: Duration::from_secs(10),
            wait: Duration::from_secs(10),
            retry_interval: Duration::from_millis(50),
        }
    }
}

/// Proof of a held lock.
///
/// `key` names what is locked; `token` identifies this particular holder so a
/// holder whose lease already expired cannot release someone else's lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHandle {
    pub key: String,
    pub token: String,
    pub lease: Duration,
}

impl LockHandle {
    /// Creates a handle with a fresh ownership token.
    pub fn new(key: impl Into<String>, lease: Duration) -> Self {
        Self {
            key: key.into(),
            token: Uuid::new_v4().to_string(),
            lease,
        }
    }
}
