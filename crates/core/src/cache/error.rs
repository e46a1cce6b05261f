use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The key is absent or expired. Callers fall back to the store.
    #[error("Cache miss: {0}")]
    Miss(String),
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CacheError {
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_display() {
        let error = CacheError::Miss("3f2c".to_string());
        assert_eq!(error.to_string(), "Cache miss: 3f2c");
        assert!(error.is_miss());
    }

    #[test]
    fn test_connection_failed_display() {
        let error = CacheError::ConnectionFailed("timeout".to_string());
        assert_eq!(error.to_string(), "Cache connection failed: timeout");
        assert!(!error.is_miss());
    }

    #[test]
    fn test_operation_failed_display() {
        let error = CacheError::OperationFailed("READONLY replica".to_string());
        assert_eq!(error.to_string(), "Cache operation failed: READONLY replica");
    }

    #[test]
    fn test_serialization_display() {
        let error = CacheError::Serialization("invalid JSON".to_string());
        assert_eq!(error.to_string(), "Serialization error: invalid JSON");
    }
}
