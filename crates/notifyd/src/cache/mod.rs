//! Coordination backend implementations.
//!
//! This module provides concrete implementations of the cache, recent list,
//! lock and event publisher traits defined in `notifyd_core`. All four share
//! one backend, selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): in-process implementations using tokio synchronization
//!   primitives. Suitable for a single instance and for tests.
//! - `redis`: Redis implementations shared by every instance pointing at the
//!   same server.
//!
//! These features are mutually exclusive - only one backend can be enabled at
//! a time.

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p notifyd --features memory"
);

#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(feature = "memory")]
pub use memory::{MemoryCache, MemoryEventPublisher, MemoryLockManager, MemoryRecentList};

#[cfg(feature = "redis")]
pub use redis_impl::{
    connect as connect_redis, RedisCache, RedisEventPublisher, RedisLockManager, RedisRecentList,
};
