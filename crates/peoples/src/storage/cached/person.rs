//! Cached person repository decorator.
//!
//! Wraps a `PersonRepository` implementation with the cache-aside pattern.
//! The store is always written before the cache is touched, and cache
//! failures never fail the call: a stale entry lives at most one TTL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use peoples_core::cache::{Cache, CacheError};
use peoples_core::person::{Filter, NewPerson, Person};
use peoples_core::storage::{PersonRepository, Result};

use crate::cache::PersonCache;

/// Cached person repository decorator.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedPersonRepository<R, C>
where
    R: PersonRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: PersonCache<C>,
}

impl<R, C> CachedPersonRepository<R, C>
where
    R: PersonRepository,
    C: Cache,
{
    /// Creates a new cached person repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for cached people
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache: PersonCache::new(cache, ttl),
        }
    }
}

#[async_trait]
impl<R, C> PersonRepository for CachedPersonRepository<R, C>
where
    R: PersonRepository + 'static,
    C: Cache + 'static,
{
    async fn get_person(&self, id: Uuid) -> Result<Person> {
        match self.cache.get(id).await {
            Ok(person) => {
                tracing::trace!(person_id = %id, "Cache hit for person");
                return Ok(person);
            }
            Err(CacheError::Miss(_)) => {
                tracing::trace!(person_id = %id, "Cache miss for person");
            }
            Err(err) => {
                tracing::warn!(person_id = %id, error = %err, "Cache read failed, falling back to store");
            }
        }

        let person = self.repository.get_person(id).await?;

        if let Err(err) = self.cache.put(&person).await {
            tracing::warn!(person_id = %id, error = %err, "Failed to cache person");
        }

        Ok(person)
    }

    async fn list_people(&self, filter: &Filter) -> Result<Vec<Person>> {
        self.repository.list_people(filter).await
    }

    async fn create_person(&self, person: &NewPerson) -> Result<Uuid> {
        // Not cached until first read.
        let id = self.repository.create_person(person).await?;
        tracing::debug!(person_id = %id, "Person created");
        Ok(id)
    }

    async fn update_person(&self, person: &Person) -> Result<()> {
        self.repository.update_person(person).await?;

        if let Err(err) = self.cache.refresh(person).await {
            tracing::warn!(
                person_id = %person.id,
                error = %err,
                "Failed to refresh person cache"
            );
        }

        tracing::debug!(person_id = %person.id, "Person updated");
        Ok(())
    }

    async fn delete_person(&self, id: Uuid) -> Result<()> {
        self.repository.delete_person(id).await?;

        if let Err(err) = self.cache.invalidate(id).await {
            tracing::warn!(person_id = %id, error = %err, "Failed to invalidate person cache");
        }

        tracing::debug!(person_id = %id, "Person deleted");
        Ok(())
    }
}
