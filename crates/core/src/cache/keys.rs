//! Cache key construction.
//!
//! Person entries are keyed by the bare identifier string so that other
//! services sharing the cache can look records up without a prefix scheme.

use uuid::Uuid;

/// Returns the cache key for a person.
pub fn person_key(person_id: Uuid) -> String {
    person_id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_key_is_hyphenated_id() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(person_key(id), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }
}
