//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use peoples_core::person::{Person, Sex};
use rusqlite::Row;
use uuid::Uuid;

/// Convert a SQLite row to a Person.
///
/// Expected columns: id, first_name, last_name, patronymic, age, sex, nation, deleted
pub fn row_to_person(row: &Row) -> rusqlite::Result<Person> {
    let id: String = row.get(0)?;
    let sex: String = row.get(5)?;

    Ok(Person {
        id: parse_id(&id)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        patronymic: row.get(3)?,
        age: row.get(4)?,
        sex: parse_sex(&sex)?,
        nation: row.get(6)?,
        deleted: row.get(7)?,
    })
}

/// Formats an identifier the way the database generates them.
pub fn format_id(id: Uuid) -> String {
    id.simple().to_string()
}

/// Parses a stored identifier. Accepts both simple and hyphenated forms.
pub fn parse_id(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_sex(s: &str) -> rusqlite::Result<Sex> {
    s.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id_matches_generated_shape() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(format_id(id), "67e5504410b1426f9247bb680e5fe0c8");
    }

    #[test]
    fn test_parse_id_accepts_generated_hex() {
        let id = parse_id("67e5504410b1426f9247bb680e5fe0c8").unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(matches!(
            parse_id("xyz"),
            Err(rusqlite::Error::FromSqlConversionFailure(..))
        ));
    }

    #[test]
    fn test_parse_sex_rejects_unknown_value() {
        assert!(parse_sex("female").is_ok());
        assert!(parse_sex("robot").is_err());
    }
}
