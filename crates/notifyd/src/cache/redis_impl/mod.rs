//! Redis coordination backend.
//!
//! Provides the shared cache, recent list, lock manager and event publisher
//! for multi-instance deployments. All four take a `redis::Client` or a
//! connection URL and use a `ConnectionManager` for reconnects.

mod cache;
mod error;
mod lock;
mod publisher;
mod recent;

pub use cache::RedisCache;
pub use lock::RedisLockManager;
pub use publisher::RedisEventPublisher;
pub use recent::RedisRecentList;

/// Opens a connection manager for `url`. Clones share one multiplexed
/// connection.
pub async fn connect(url: &str) -> redis::RedisResult<redis::aio::ConnectionManager> {
    let client = redis::Client::open(url)?;
    redis::aio::ConnectionManager::new(client).await
}
