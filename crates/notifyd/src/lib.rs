//! notifyd keeps a durable notification store, a lookaside cache with a
//! bounded recent list, and an event topic in step.
//!
//! Backends are chosen at compile time: storage with `inmemory` or `sqlite`,
//! coordination (cache, recent list, locks, publisher) with `memory` or
//! `redis`.

pub mod cache;
pub mod config;
pub mod service;
pub mod state;
pub mod storage;

pub use config::Config;
pub use service::NotificationService;
