//! Queue adapters for the ingestion pipeline.
//!
//! The Kafka consumer and failure producer are compiled with the `kafka`
//! feature, which links librdkafka.

#[cfg(feature = "kafka")]
pub mod kafka;

#[cfg(test)]
pub mod memory;

#[cfg(feature = "kafka")]
pub use kafka::{KafkaConsumer, KafkaFailureProducer};
