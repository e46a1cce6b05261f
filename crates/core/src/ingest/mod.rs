//! Enrichment-request ingestion contract.
//!
//! Message decoding and validation are pure functions here; the poll loop
//! and queue clients live in the binary and talk to the queue through
//! [`MessageConsumer`] and [`FailureSink`].

mod error;
mod failure;
mod message;
mod traits;

pub use error::{QueueError, Result, ShutdownError};
pub use failure::EnrichmentFailure;
pub use message::{decode_request, Delivery, EnrichmentRequest, ValidatedRequest, ValidationError};
pub use traits::{FailureSink, MessageConsumer};
