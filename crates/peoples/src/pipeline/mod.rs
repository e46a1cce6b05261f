//! Queue-driven enrichment pipeline.
//!
//! One polling task reads enrichment requests; every valid request is
//! enriched and persisted on its own tracked task. See [`Ingester`].

mod ingester;

pub use ingester::{Ingester, IngesterHandle};
