use async_trait::async_trait;
use uuid::Uuid;

use crate::person::{Filter, NewPerson, Person};

use super::Result;

/// Repository for person records.
///
/// Implemented by the durable store itself and by the cache-aside decorator
/// that wraps it. Callers depend only on this trait.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Gets a person by ID, failing with `NotFound` when absent.
    async fn get_person(&self, id: Uuid) -> Result<Person>;

    /// Lists people matching the filter, ordered by ID ascending.
    async fn list_people(&self, filter: &Filter) -> Result<Vec<Person>>;

    /// Creates a person and returns the identifier assigned by the store.
    async fn create_person(&self, person: &NewPerson) -> Result<Uuid>;

    /// Replaces every mutable field of an existing person.
    async fn update_person(&self, person: &Person) -> Result<()>;

    /// Marks a person as deleted. Deleting an already deleted person succeeds.
    async fn delete_person(&self, id: Uuid) -> Result<()>;
}
