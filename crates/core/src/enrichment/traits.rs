use async_trait::async_trait;

use super::{Demographics, Result};

/// Looks up demographic attributes for a given name.
///
/// Implementations perform no retries; retry policy belongs to the caller.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, name: &str) -> Result<Demographics>;
}
