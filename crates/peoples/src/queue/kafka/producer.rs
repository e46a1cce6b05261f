//! Failure-record producer.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};

use peoples_core::ingest::{EnrichmentFailure, FailureSink, Result};

use super::error::{map_publish_error, map_setup_error};

const QUEUE_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes [`EnrichmentFailure`] records as JSON to the failure topic.
pub struct KafkaFailureProducer {
    producer: FutureProducer,
    topic: String,
}

impl KafkaFailureProducer {
    pub fn new(brokers: &str, topic: impl Into<String>) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(map_setup_error)?;

        Ok(Self {
            producer,
            topic: topic.into(),
        })
    }
}

#[async_trait]
impl FailureSink for KafkaFailureProducer {
    async fn publish(&self, failure: &EnrichmentFailure) -> Result<()> {
        let payload = failure.to_json()?;
        let record = FutureRecord::<(), _>::to(&self.topic).payload(&payload);

        let (partition, offset) = self
            .producer
            .send(record, QUEUE_TIMEOUT)
            .await
            .map_err(|(err, _message)| map_publish_error(err))?;

        tracing::debug!(topic = %self.topic, partition, offset, "Failure record published");
        Ok(())
    }
}
