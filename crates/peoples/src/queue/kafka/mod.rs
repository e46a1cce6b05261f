//! Kafka adapters built on `rdkafka`.

mod consumer;
mod error;
mod producer;

pub use consumer::KafkaConsumer;
pub use producer::KafkaFailureProducer;
