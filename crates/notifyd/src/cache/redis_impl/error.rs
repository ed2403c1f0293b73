//! Redis error mapping to the core error types.

use notifyd_core::cache::CacheError;
use notifyd_core::events::PublishError;
use notifyd_core::lock::LockError;

fn is_connection_error(err: &redis::RedisError) -> bool {
    err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped()
}

/// Maps Redis errors to CacheError.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if is_connection_error(&err) {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}

/// Maps Redis errors to LockError.
pub fn map_redis_lock_error(err: redis::RedisError) -> LockError {
    if is_connection_error(&err) {
        LockError::ConnectionFailed(err.to_string())
    } else {
        LockError::OperationFailed(err.to_string())
    }
}

/// Maps Redis errors to PublishError.
pub fn map_redis_publish_error(err: redis::RedisError) -> PublishError {
    if is_connection_error(&err) {
        PublishError::ConnectionFailed(err.to_string())
    } else {
        PublishError::PublishFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_error() -> redis::RedisError {
        redis::RedisError::from((redis::ErrorKind::TypeError, "WRONGTYPE"))
    }

    fn io_error() -> redis::RedisError {
        redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ))
    }

    #[test]
    fn test_operation_errors() {
        assert!(matches!(
            map_redis_error(type_error()),
            CacheError::OperationFailed(_)
        ));
        assert!(matches!(
            map_redis_lock_error(type_error()),
            LockError::OperationFailed(_)
        ));
        assert!(matches!(
            map_redis_publish_error(type_error()),
            PublishError::PublishFailed(_)
        ));
    }

    #[test]
    fn test_connection_refused() {
        assert!(matches!(
            map_redis_error(io_error()),
            CacheError::ConnectionFailed(_)
        ));
        assert!(matches!(
            map_redis_lock_error(io_error()),
            LockError::ConnectionFailed(_)
        ));
        assert!(matches!(
            map_redis_publish_error(io_error()),
            PublishError::ConnectionFailed(_)
        ));
    }
}
