mod error;
mod keys;
mod traits;
mod types;

pub use error::{LockError, Result};
pub use keys::{creation_lock_key, notification_lock_key};
pub use traits::LockManager;
pub use types::{LockHandle, LockPolicy};
