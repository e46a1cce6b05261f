//! Core of the peoples service.
//!
//! Pure domain types, validation rules and the async capability traits that
//! the adapters in the `peoples` binary implement. Nothing in this crate
//! performs I/O.

pub mod cache;
pub mod enrichment;
pub mod ingest;
pub mod person;
pub mod storage;
