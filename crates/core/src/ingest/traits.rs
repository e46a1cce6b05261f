use std::time::Duration;

use async_trait::async_trait;

use super::{Delivery, EnrichmentFailure, Result};

/// Source of enrichment-request messages with explicit offset commits.
#[async_trait]
pub trait MessageConsumer: Send + Sync {
    /// Waits up to `timeout` for the next message. `Ok(None)` means the
    /// timeout elapsed with nothing to read.
    async fn poll(&self, timeout: Duration) -> Result<Option<Delivery>>;

    /// Acknowledges a message so it is not delivered again to the group.
    async fn commit(&self, delivery: &Delivery) -> Result<()>;
}

/// Destination for records describing messages that could not be processed.
#[async_trait]
pub trait FailureSink: Send + Sync {
    async fn publish(&self, failure: &EnrichmentFailure) -> Result<()>;
}
