use std::time::Duration;

use thiserror::Error;

/// Errors raised by queue clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Poll failed: {0}")]
    PollFailed(String),
    #[error("Commit failed: {0}")]
    CommitFailed(String),
    #[error("Publish failed: {0}")]
    PublishFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Errors raised while draining the ingestion pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShutdownError {
    /// In-flight messages were still running when the deadline elapsed.
    #[error("shutdown deadline of {0:?} exceeded with messages still in flight")]
    DeadlineExceeded(Duration),
    /// The polling task ended without signalling completion.
    #[error("ingestion task ended unexpectedly")]
    Aborted,
}
