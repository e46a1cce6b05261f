mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::person_key;
pub use serialization::{deserialize_person, serialize_person, SerializationError};
pub use traits::Cache;
