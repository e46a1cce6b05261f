//! SQLite storage backend.
//!
//! Uses `rusqlite` for the statements and `tokio-rusqlite` to run them on a
//! dedicated thread. Every write runs in its own transaction.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
