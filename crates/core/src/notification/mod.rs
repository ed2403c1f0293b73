mod error;
mod requests;
mod types;

pub use error::NotificationError;
pub use requests::{CreateNotificationRequest, UpdateNotificationRequest};
pub use types::{NewNotification, Notification, NotificationId, NotificationType};
