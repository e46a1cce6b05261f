//! Enrichment-request consumer.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::{Offset, TopicPartitionList};

use peoples_core::ingest::{Delivery, MessageConsumer, Result};

use super::error::{map_commit_error, map_poll_error, map_setup_error};

/// Consumer-group member reading one topic with manual offset commits.
///
/// New groups start from the earliest offset. Auto-commit is disabled:
/// an offset moves only when [`MessageConsumer::commit`] is called.
pub struct KafkaConsumer {
    consumer: StreamConsumer,
}

impl KafkaConsumer {
    pub fn new(brokers: &str, group: &str, topic: &str) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .create()
            .map_err(map_setup_error)?;

        consumer.subscribe(&[topic]).map_err(map_setup_error)?;
        tracing::info!(brokers, group, topic, "Kafka consumer subscribed");

        Ok(Self { consumer })
    }
}

#[async_trait]
impl MessageConsumer for KafkaConsumer {
    async fn poll(&self, timeout: Duration) -> Result<Option<Delivery>> {
        let message = match tokio::time::timeout(timeout, self.consumer.recv()).await {
            Err(_) => return Ok(None),
            Ok(received) => received.map_err(map_poll_error)?,
        };

        Ok(Some(Delivery {
            topic: message.topic().to_string(),
            partition: message.partition(),
            offset: message.offset(),
            payload: message.payload().map(<[u8]>::to_vec),
        }))
    }

    async fn commit(&self, delivery: &Delivery) -> Result<()> {
        // Kafka stores the offset of the next message to read.
        let mut partitions = TopicPartitionList::new();
        partitions
            .add_partition_offset(
                &delivery.topic,
                delivery.partition,
                Offset::Offset(delivery.offset + 1),
            )
            .map_err(map_commit_error)?;

        self.consumer
            .commit(&partitions, CommitMode::Async)
            .map_err(map_commit_error)
    }
}
