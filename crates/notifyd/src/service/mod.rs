//! Notification orchestration.
//!
//! [`NotificationService`] is the single entry point for reads and writes.
//! Event publishing runs behind an [`EventDispatcher`] and record locks are
//! held through [`LockGuard`].

mod dispatcher;
mod locking;
mod orchestrator;

pub use dispatcher::{EventDispatcher, PublishPolicy};
pub use locking::LockGuard;
pub use orchestrator::{NotificationService, ServiceOptions};
