//! rdkafka error mapping to QueueError.

use peoples_core::ingest::QueueError;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};

/// Maps a client construction or subscription error.
pub fn map_setup_error(err: KafkaError) -> QueueError {
    QueueError::ConnectionFailed(err.to_string())
}

/// Maps an error returned while receiving a message.
pub fn map_poll_error(err: KafkaError) -> QueueError {
    match err.rdkafka_error_code() {
        Some(RDKafkaErrorCode::AllBrokersDown) | Some(RDKafkaErrorCode::BrokerTransportFailure) => {
            QueueError::ConnectionFailed(err.to_string())
        }
        _ => QueueError::PollFailed(err.to_string()),
    }
}

pub fn map_commit_error(err: KafkaError) -> QueueError {
    QueueError::CommitFailed(err.to_string())
}

pub fn map_publish_error(err: KafkaError) -> QueueError {
    QueueError::PublishFailed(err.to_string())
}
