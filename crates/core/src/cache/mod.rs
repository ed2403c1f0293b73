mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{notification_key, RECENT_CAPACITY, RECENT_NOTIFICATIONS_KEY};
pub use serialization::{
    deserialize_notification, deserialize_notifications, serialize_notification,
    serialize_notifications, SerializationError,
};
pub use traits::{Cache, RecentList};
