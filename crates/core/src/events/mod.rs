mod error;
mod traits;

pub use error::{PublishError, Result};
pub use traits::{EventPublisher, NOTIFICATION_TOPIC};
