use std::{env, str::FromStr, time::Duration};

use notifyd_core::events::NOTIFICATION_TOPIC;
use notifyd_core::lock::LockPolicy;

use crate::service::{PublishPolicy, ServiceOptions};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "notifyd.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    pub redis_url: String,
    /// Per-id cache TTL in seconds, 0 for no expiry (default: 300)
    pub cache_ttl_seconds: u64,
    /// Delay of the second cache eviction after updates and deletes in
    /// milliseconds (default: 1,000)
    pub cache_reevict_ms: u64,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Lock lease in milliseconds (default: 10,000)
    pub lock_lease_ms: u64,
    /// Maximum wait for a contended lock in milliseconds (default: 10,000)
    pub lock_wait_ms: u64,
    /// Pause between lock attempts in milliseconds (default: 50)
    pub lock_retry_ms: u64,
    /// Topic committed notifications are published to (default: "notification-topic")
    pub event_topic: String,
    /// Publish attempts per event (default: 3)
    pub publish_max_attempts: u32,
    /// Base backoff between publish attempts in milliseconds (default: 200)
    pub publish_backoff_ms: u64,
    /// Timeout of a single publish attempt in milliseconds (default: 5,000)
    pub publish_timeout_ms: u64,
    /// Events buffered ahead of the publisher (default: 1,024)
    pub event_queue_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "notifyd.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `CACHE_TTL_SECONDS` - Per-id cache TTL, 0 disables expiry (default: 300)
    /// - `CACHE_REEVICT_MS` - Delay of the second eviction after writes (default: 1,000)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `LOCK_LEASE_MS` - Lock lease (default: 10,000)
    /// - `LOCK_WAIT_MS` - Lock wait budget (default: 10,000)
    /// - `LOCK_RETRY_MS` - Lock retry interval (default: 50)
    /// - `EVENT_TOPIC` - Event topic (default: "notification-topic")
    /// - `PUBLISH_MAX_ATTEMPTS` - Publish attempts (default: 3)
    /// - `PUBLISH_BACKOFF_MS` - Publish backoff (default: 200)
    /// - `PUBLISH_TIMEOUT_MS` - Publish timeout (default: 5,000)
    /// - `EVENT_QUEUE_CAPACITY` - Event queue size (default: 1,024)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "notifyd.db".to_string()),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            cache_ttl_seconds: parse_var(&lookup, "CACHE_TTL_SECONDS", 300),
            cache_reevict_ms: parse_var(&lookup, "CACHE_REEVICT_MS", 1_000),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES", 10_000),
            lock_lease_ms: parse_var(&lookup, "LOCK_LEASE_MS", 10_000),
            lock_wait_ms: parse_var(&lookup, "LOCK_WAIT_MS", 10_000),
            lock_retry_ms: parse_var(&lookup, "LOCK_RETRY_MS", 50),
            event_topic: lookup("EVENT_TOPIC")
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| NOTIFICATION_TOPIC.to_string()),
            publish_max_attempts: parse_var(&lookup, "PUBLISH_MAX_ATTEMPTS", 3),
            publish_backoff_ms: parse_var(&lookup, "PUBLISH_BACKOFF_MS", 200),
            publish_timeout_ms: parse_var(&lookup, "PUBLISH_TIMEOUT_MS", 5_000),
            event_queue_capacity: parse_var(&lookup, "EVENT_QUEUE_CAPACITY", 1_024),
        }
    }

    /// Get cache TTL as a Duration. `None` when entries never expire.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_seconds > 0).then(|| Duration::from_secs(self.cache_ttl_seconds))
    }

    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy::new(
            Duration::from_millis(self.lock_lease_ms),
            Duration::from_millis(self.lock_wait_ms),
            Duration::from_millis(self.lock_retry_ms),
        )
    }

    pub fn publish_policy(&self) -> PublishPolicy {
        PublishPolicy {
            topic: self.event_topic.clone(),
            max_attempts: self.publish_max_attempts,
            backoff: Duration::from_millis(self.publish_backoff_ms),
            timeout: Duration::from_millis(self.publish_timeout_ms),
            queue_capacity: self.event_queue_capacity,
        }
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            lock_policy: self.lock_policy(),
            cache_ttl: self.cache_ttl(),
            reevict_delay: Duration::from_millis(self.cache_reevict_ms),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
