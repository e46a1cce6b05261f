//! Storage backend implementations.
//!
//! `sqlite` is the durable store gateway; `cached` wraps any
//! [`PersonRepository`](peoples_core::storage::PersonRepository) with the
//! cache-aside policy. Both sides are handed out as
//! `Arc<dyn PersonRepository>` so callers never know which one they hold.

pub mod cached;
pub mod sqlite;

pub use cached::CachedPersonRepository;
pub use sqlite::SqliteRepository;
