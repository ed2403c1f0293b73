//! In-memory recent list.
//!
//! Every operation runs inside one critical section of a single mutex, which
//! is what makes each of them atomic with respect to the others.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use notifyd_core::cache::{RecentList, Result, RECENT_CAPACITY};
use notifyd_core::notification::{Notification, NotificationId};

/// Bounded, newest-first list of notifications held in process memory.
#[derive(Debug, Clone)]
pub struct MemoryRecentList {
    items: Arc<Mutex<VecDeque<Notification>>>,
    capacity: usize,
}

impl MemoryRecentList {
    /// Creates an empty list holding at most [`RECENT_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(RECENT_CAPACITY)
    }

    /// Creates an empty list with a custom bound.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Arc::new(Mutex::new(VecDeque::with_capacity(capacity + 1))),
            capacity,
        }
    }
}

impl Default for MemoryRecentList {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecentList for MemoryRecentList {
    async fn push_recent(&self, notification: &Notification) -> Result<()> {
        let mut items = self.items.lock().await;
        items.push_front(notification.clone());
        items.truncate(self.capacity);
        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<Notification>> {
        let items = self.items.lock().await;
        Ok(items.iter().cloned().collect())
    }

    async fn update_recent_if_present(&self, notification: &Notification) -> Result<bool> {
        let mut items = self.items.lock().await;
        match items.iter_mut().find(|n| n.id == notification.id) {
            Some(slot) => {
                *slot = notification.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_recent(&self, id: NotificationId) -> Result<bool> {
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|n| n.id != id);
        Ok(items.len() != before)
    }
}
