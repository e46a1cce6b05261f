//! Pure functions for serializing/deserializing people to/from cache bytes.
//!
//! JSON keeps cache values human-readable and easy to inspect with
//! `redis-cli`.

use crate::person::Person;
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

impl From<SerializationError> for super::CacheError {
    fn from(err: SerializationError) -> Self {
        super::CacheError::Serialization(err.to_string())
    }
}

/// Serializes a person to JSON bytes.
pub fn serialize_person(person: &Person) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(person).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a person.
pub fn deserialize_person(bytes: &[u8]) -> Result<Person, SerializationError> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheError;
    use crate::person::{NewPerson, Sex};
    use uuid::Uuid;

    fn sample_person() -> Person {
        Person::from_new(
            Uuid::new_v4(),
            NewPerson::new("Alice", "Doe").with_demographics(30, Sex::Female, "US"),
        )
    }

    #[test]
    fn test_person_survives_cache_encoding() {
        let person = sample_person();

        let bytes = serialize_person(&person).unwrap();
        let restored = deserialize_person(&bytes).unwrap();

        assert_eq!(restored, person);
    }

    #[test]
    fn test_cache_value_uses_snake_case_fields() {
        let bytes = serialize_person(&sample_person()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["first_name"], "Alice");
        assert_eq!(value["sex"], "female");
        assert_eq!(value["deleted"], false);
    }

    #[test]
    fn test_deserialize_garbage_fails() {
        let result = deserialize_person(b"not json");
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_serialization_error_converts_to_cache_error() {
        let err: CacheError = SerializationError::DeserializeFailed("eof".to_string()).into();
        assert_eq!(
            err,
            CacheError::Serialization("Failed to deserialize: eof".to_string())
        );
    }
}
