//! Typed person entries on top of a byte-level [`Cache`].

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use peoples_core::cache::{deserialize_person, person_key, serialize_person, Cache, CacheError, Result};
use peoples_core::person::Person;

/// Person records keyed by id, each stored with the same TTL.
///
/// A missing or expired entry surfaces as [`CacheError::Miss`]; a value
/// that no longer decodes surfaces as [`CacheError::Serialization`].
pub struct PersonCache<C: Cache> {
    cache: Arc<C>,
    ttl: Duration,
}

impl<C: Cache> PersonCache<C> {
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub async fn put(&self, person: &Person) -> Result<()> {
        let bytes = serialize_person(person)?;
        self.cache
            .set(&person_key(person.id), &bytes, Some(self.ttl))
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Person> {
        let key = person_key(id);
        match self.cache.get(&key).await? {
            Some(bytes) => Ok(deserialize_person(&bytes)?),
            None => Err(CacheError::Miss(key)),
        }
    }

    pub async fn invalidate(&self, id: Uuid) -> Result<()> {
        self.cache.delete(&person_key(id)).await
    }

    /// Replaces the entry for `person`: the old value is removed before the
    /// new one is written, never patched in place.
    pub async fn refresh(&self, person: &Person) -> Result<()> {
        self.invalidate(person.id).await?;
        self.put(person).await
    }
}
