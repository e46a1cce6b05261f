//! Application state shared by the REST handlers.

use std::sync::Arc;

use peoples_core::storage::PersonRepository;

#[cfg(test)]
use crate::storage::SqliteRepository;

/// Shared application state.
///
/// Handlers only see the repository capability; whether it is the durable
/// store alone or the cache-aside decorator is decided at startup.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn PersonRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn PersonRepository>) -> Self {
        Self { repository }
    }

    /// State backed by a fresh in-memory SQLite database.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let repository = SqliteRepository::new_in_memory()
            .await
            .expect("in-memory SQLite must open");
        Self::new(Arc::new(repository))
    }
}
