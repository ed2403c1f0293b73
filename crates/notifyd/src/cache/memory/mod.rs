//! In-memory coordination backend.
//!
//! Thread-safe implementations for single-instance deployments and tests.
//! Nothing here is shared across processes.

mod cache;
mod lock;
mod publisher;
mod recent;

pub use cache::MemoryCache;
pub use lock::MemoryLockManager;
pub use publisher::MemoryEventPublisher;
pub use recent::MemoryRecentList;
