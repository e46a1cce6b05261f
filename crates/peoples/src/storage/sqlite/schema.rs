//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Identifiers are generated by the database as 32 hex
//! characters, which parse directly as a UUID in simple form.

/// Creates the `peoples` table if it is missing.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS peoples (
    id TEXT PRIMARY KEY NOT NULL DEFAULT (lower(hex(randomblob(16)))),
    first_name TEXT NOT NULL CHECK (first_name <> ''),
    last_name TEXT NOT NULL CHECK (last_name <> ''),
    patronymic TEXT,
    age INTEGER CHECK (age IS NULL OR age >= 0),
    sex TEXT NOT NULL DEFAULT 'unknown',
    nation TEXT NOT NULL DEFAULT '',
    deleted INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_peoples_deleted ON peoples(deleted);
"#;

pub const INSERT_PERSON: &str = r#"
INSERT INTO peoples (first_name, last_name, patronymic, age, sex, nation)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
RETURNING id
"#;

pub const SELECT_PERSON_BY_ID: &str = r#"
SELECT id, first_name, last_name, patronymic, age, sex, nation, deleted
FROM peoples
WHERE id = ?1
"#;

pub const SELECT_PEOPLE: &str = r#"
SELECT id, first_name, last_name, patronymic, age, sex, nation, deleted
FROM peoples
WHERE deleted = ?1
ORDER BY id
LIMIT ?2 OFFSET ?3
"#;

pub const UPDATE_PERSON: &str = r#"
UPDATE peoples
SET first_name = ?2, last_name = ?3, patronymic = ?4, age = ?5, sex = ?6, nation = ?7, deleted = ?8
WHERE id = ?1
"#;

pub const SOFT_DELETE_PERSON: &str = r#"
UPDATE peoples
SET deleted = 1
WHERE id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent_sql() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS peoples"));
        assert!(CREATE_TABLES.contains("CREATE INDEX IF NOT EXISTS"));
    }

    #[test]
    fn test_queries_contain_expected_keywords() {
        assert!(INSERT_PERSON.contains("RETURNING id"));
        assert!(SELECT_PERSON_BY_ID.contains("WHERE id = ?1"));
        assert!(SELECT_PEOPLE.contains("ORDER BY id"));
        assert!(SELECT_PEOPLE.contains("LIMIT ?2 OFFSET ?3"));
        assert!(UPDATE_PERSON.contains("deleted = ?8"));
        assert!(SOFT_DELETE_PERSON.contains("SET deleted = 1"));
        assert!(!SOFT_DELETE_PERSON.contains("DELETE FROM"));
    }
}
