//! Cached repository decorators.
//!
//! - **Reads**: check the cache first, on miss fetch from the repository and
//!   populate the cache
//! - **Writes**: persist to the repository first, then refresh or evict the
//!   cache entry
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let repo = Arc::new(SqliteRepository::new("peoples.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let cached_repo = CachedPersonRepository::new(repo, cache, Duration::from_secs(300));
//! ```

mod person;

pub use person::CachedPersonRepository;
