//! Pure mapping from service errors to HTTP status codes, for whichever
//! transport layer sits in front of the service.

use crate::storage::repository_error_to_status_code;

use super::ServiceError;

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// - `InvalidType`, `InvalidRequest` -> 400 (Bad Request)
/// - `NotFound` -> 404 (Not Found)
/// - `LockTimeout` -> 409 (Conflict): the record is busy, retrying may succeed
/// - `LockUnavailable` -> 503 (Service Unavailable)
/// - `Store` -> delegated to [`repository_error_to_status_code`]
///
/// # Examples
///
/// ```
/// use notifyd_core::notification::NotificationId;
/// use notifyd_core::service::{service_error_to_status_code, ServiceError};
///
/// let error = ServiceError::NotFound(NotificationId::new(1));
/// assert_eq!(service_error_to_status_code(&error), 404);
/// ```
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::InvalidType(_) => 400,
        ServiceError::InvalidRequest(_) => 400,
        ServiceError::NotFound(_) => 404,
        ServiceError::LockTimeout { .. } => 409,
        ServiceError::LockUnavailable(_) => 503,
        ServiceError::Store(err) => repository_error_to_status_code(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationId;
    use crate::storage::RepositoryError;

    #[test]
    fn test_invalid_type_maps_to_400() {
        let error = ServiceError::InvalidType("fax".to_string());
        assert_eq!(service_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let error = ServiceError::NotFound(NotificationId::new(1));
        assert_eq!(service_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_lock_timeout_maps_to_409() {
        let error = ServiceError::LockTimeout {
            key: "notification-lock:1".to_string(),
        };
        assert_eq!(service_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_store_errors_delegate() {
        let error = ServiceError::Store(RepositoryError::ConnectionFailed("down".to_string()));
        assert_eq!(service_error_to_status_code(&error), 503);
    }
}
