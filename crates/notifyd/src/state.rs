//! Service wiring.
//!
//! Builds a [`NotificationService`] from [`Config`] using whichever storage
//! and coordination backends were selected through Cargo features.

use std::sync::Arc;

use notifyd_core::cache::{Cache, RecentList};
use notifyd_core::events::EventPublisher;
use notifyd_core::lock::LockManager;
use notifyd_core::storage::NotificationRepository;

use crate::config::Config;
use crate::service::{EventDispatcher, NotificationService};

/// The cache-side collaborators. They always come from the same backend.
pub struct Coordination {
    pub cache: Arc<dyn Cache>,
    pub recent: Arc<dyn RecentList>,
    pub locks: Arc<dyn LockManager>,
    pub publisher: Arc<dyn EventPublisher>,
}

/// Builds the service. Must run inside a tokio runtime, since the event
/// dispatcher spawns its worker here.
pub async fn build_service(config: &Config) -> anyhow::Result<NotificationService> {
    let repository = build_repository(config).await?;
    let coordination = build_coordination(config).await?;

    tracing::info!(
        storage = storage_backend_name(),
        coordination = coordination_backend_name(),
        topic = %config.event_topic,
        "Notification service initialized"
    );

    Ok(NotificationService::new(
        repository,
        coordination.cache,
        coordination.recent,
        coordination.locks,
        EventDispatcher::spawn(coordination.publisher, config.publish_policy()),
        config.service_options(),
    ))
}

#[cfg(feature = "inmemory")]
async fn build_repository(_config: &Config) -> anyhow::Result<Arc<dyn NotificationRepository>> {
    use crate::storage::InMemoryRepository;

    Ok(Arc::new(InMemoryRepository::new()))
}

#[cfg(feature = "sqlite")]
async fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn NotificationRepository>> {
    use crate::storage::SqliteRepository;

    tracing::debug!(path = %config.sqlite_path, "Opening SQLite database");
    Ok(Arc::new(SqliteRepository::new(&config.sqlite_path).await?))
}

#[cfg(feature = "memory")]
async fn build_coordination(config: &Config) -> anyhow::Result<Coordination> {
    use crate::cache::{MemoryCache, MemoryEventPublisher, MemoryLockManager, MemoryRecentList};

    Ok(Coordination {
        cache: Arc::new(MemoryCache::new(config.cache_max_entries)),
        recent: Arc::new(MemoryRecentList::new()),
        locks: Arc::new(MemoryLockManager::new()),
        publisher: Arc::new(MemoryEventPublisher::new()),
    })
}

#[cfg(feature = "redis")]
async fn build_coordination(config: &Config) -> anyhow::Result<Coordination> {
    use crate::cache::{
        connect_redis, RedisCache, RedisEventPublisher, RedisLockManager, RedisRecentList,
    };

    let conn = connect_redis(&config.redis_url).await?;

    Ok(Coordination {
        cache: Arc::new(RedisCache::from_connection(conn.clone())),
        recent: Arc::new(RedisRecentList::from_connection(conn.clone())),
        locks: Arc::new(RedisLockManager::from_connection(conn.clone())),
        publisher: Arc::new(RedisEventPublisher::from_connection(conn)),
    })
}

fn storage_backend_name() -> &'static str {
    if cfg!(feature = "sqlite") {
        "sqlite"
    } else {
        "inmemory"
    }
}

fn coordination_backend_name() -> &'static str {
    if cfg!(feature = "redis") {
        "redis"
    } else {
        "memory"
    }
}

#[cfg(all(test, feature = "inmemory", feature = "memory"))]
mod tests {
    use super::*;
    use notifyd_core::notification::CreateNotificationRequest;

    fn test_config() -> Config {
        Config::from_lookup(|_| None)
    }

    #[tokio::test]
    async fn test_build_default_service() {
        let service = build_service(&test_config()).await.unwrap();

        let created = service
            .create(&CreateNotificationRequest::new("email", "a@b.c", "s", "c"))
            .await
            .unwrap();

        assert_eq!(service.get_by_id(created.id).await.unwrap(), created);
        assert_eq!(service.get_recent().await, vec![created]);
        service.shutdown().await;
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(storage_backend_name(), "inmemory");
        assert_eq!(coordination_backend_name(), "memory");
    }
}
