//! SQLite repository implementation.
//!
//! Implements [`PersonRepository`] from `peoples_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::Transaction;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use peoples_core::person::{Filter, NewPerson, Person};
use peoples_core::storage::{PersonRepository, RepositoryError, Result};

use super::conversions::{format_id, parse_id, row_to_person};
use super::error::{map_tokio_rusqlite_error_with_id, RollbackFailure};
use super::schema;

const ENTITY: &str = "Person";

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Runs `op` inside a transaction, committing on success.
///
/// A failing statement triggers an explicit rollback. If that rollback
/// fails too, the error carries both causes as a [`RollbackFailure`].
fn run_in_transaction<T>(
    conn: &mut rusqlite::Connection,
    op: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
) -> std::result::Result<T, tokio_rusqlite::Error> {
    let tx = conn.transaction().map_err(wrap_err)?;
    match op(&tx) {
        Ok(value) => {
            tx.commit().map_err(wrap_err)?;
            Ok(value)
        }
        Err(cause) => match tx.rollback() {
            Ok(()) => Err(wrap_err(cause)),
            Err(reason) => Err(tokio_rusqlite::Error::Other(Box::new(RollbackFailure {
                cause,
                reason,
            }))),
        },
    }
}

/// SQLite-based person repository.
///
/// The durable store and single source of truth for person records.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// The `peoples` table is created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

fn check_names(first_name: &str, last_name: &str) -> Result<()> {
    if first_name.is_empty() {
        return Err(RepositoryError::InvalidData(
            "First name cannot be empty".to_string(),
        ));
    }
    if last_name.is_empty() {
        return Err(RepositoryError::InvalidData(
            "Last name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl PersonRepository for SqliteRepository {
    async fn get_person(&self, id: Uuid) -> Result<Person> {
        let id_str = format_id(id);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_PERSON_BY_ID).map_err(wrap_err)?;
                stmt.query_row([&id_str], row_to_person).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, id.to_string()))
    }

    async fn list_people(&self, filter: &Filter) -> Result<Vec<Person>> {
        let Filter {
            offset,
            limit,
            deleted,
        } = *filter;

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_PEOPLE).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![deleted, limit, offset], row_to_person)
                    .map_err(wrap_err)?;

                let mut people = Vec::new();
                for row_result in rows {
                    people.push(row_result.map_err(wrap_err)?);
                }
                Ok(people)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, "unknown"))
    }

    async fn create_person(&self, person: &NewPerson) -> Result<Uuid> {
        check_names(&person.first_name, &person.last_name)?;

        let first_name = person.first_name.clone();
        let last_name = person.last_name.clone();
        let patronymic = person.patronymic.clone();
        let age = person.age;
        let sex = person.sex.as_str();
        let nation = person.nation.clone();

        let id = self
            .conn
            .call(move |conn| {
                run_in_transaction(conn, |tx| {
                    tx.query_row(
                        schema::INSERT_PERSON,
                        rusqlite::params![first_name, last_name, patronymic, age, sex, nation],
                        |row| row.get::<_, String>(0),
                    )
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, "new"))?;

        let id = parse_id(&id).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        tracing::debug!(person_id = %id, "Person created");
        Ok(id)
    }

    async fn update_person(&self, person: &Person) -> Result<()> {
        check_names(&person.first_name, &person.last_name)?;

        let id = format_id(person.id);
        let first_name = person.first_name.clone();
        let last_name = person.last_name.clone();
        let patronymic = person.patronymic.clone();
        let age = person.age;
        let sex = person.sex.as_str();
        let nation = person.nation.clone();
        let deleted = person.deleted;

        self.conn
            .call(move |conn| {
                run_in_transaction(conn, |tx| {
                    let rows = tx.execute(
                        schema::UPDATE_PERSON,
                        rusqlite::params![
                            id, first_name, last_name, patronymic, age, sex, nation, deleted
                        ],
                    )?;
                    if rows == 0 {
                        Err(rusqlite::Error::QueryReturnedNoRows)
                    } else {
                        Ok(())
                    }
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, person.id.to_string()))
    }

    async fn delete_person(&self, id: Uuid) -> Result<()> {
        let id_str = format_id(id);

        // Matched rows count even when the flag is already set, so a second
        // delete succeeds while an unknown id reports zero rows.
        self.conn
            .call(move |conn| {
                run_in_transaction(conn, |tx| {
                    let rows = tx.execute(schema::SOFT_DELETE_PERSON, [&id_str])?;
                    if rows == 0 {
                        Err(rusqlite::Error::QueryReturnedNoRows)
                    } else {
                        Ok(())
                    }
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peoples_core::person::Sex;

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    fn alice() -> NewPerson {
        NewPerson::new("Alice", "Doe").with_demographics(30, Sex::Female, "US")
    }

    #[tokio::test]
    async fn test_create_then_get_returns_supplied_fields() {
        let repo = repo().await;

        let id = repo
            .create_person(&alice().with_patronymic("Ann"))
            .await
            .unwrap();
        let person = repo.get_person(id).await.unwrap();

        assert_eq!(person.id, id);
        assert_eq!(person.first_name, "Alice");
        assert_eq!(person.last_name, "Doe");
        assert_eq!(person.patronymic.as_deref(), Some("Ann"));
        assert_eq!(person.age, Some(30));
        assert_eq!(person.sex, Sex::Female);
        assert_eq!(person.nation, "US");
        assert!(!person.deleted);
    }

    #[tokio::test]
    async fn test_create_without_demographics() {
        let repo = repo().await;

        let id = repo.create_person(&NewPerson::new("Bob", "Roe")).await.unwrap();
        let person = repo.get_person(id).await.unwrap();

        assert_eq!(person.age, None);
        assert_eq!(person.sex, Sex::Unknown);
        assert_eq!(person.nation, "");
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let repo = repo().await;

        let first = repo.create_person(&alice()).await.unwrap();
        let second = repo.create_person(&alice()).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_names() {
        let repo = repo().await;

        let result = repo.create_person(&NewPerson::new("", "Doe")).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));

        let people = repo.list_people(&Filter::default()).await.unwrap();
        assert!(people.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = repo().await;
        let id = Uuid::new_v4();

        let result = repo.get_person(id).await;

        assert_eq!(
            result,
            Err(RepositoryError::NotFound {
                entity_type: "Person",
                id: id.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_update_replaces_mutable_fields() {
        let repo = repo().await;
        let id = repo.create_person(&alice()).await.unwrap();

        let mut person = repo.get_person(id).await.unwrap();
        person.last_name = "Smith".to_string();
        person.age = Some(31);
        person.patronymic = None;
        repo.update_person(&person).await.unwrap();

        assert_eq!(repo.get_person(id).await.unwrap(), person);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo().await;
        let person = Person::from_new(Uuid::new_v4(), alice());

        let result = repo.update_person(&person).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_rejects_empty_last_name() {
        let repo = repo().await;
        let id = repo.create_person(&alice()).await.unwrap();

        let mut person = repo.get_person(id).await.unwrap();
        person.last_name.clear();

        let result = repo.update_person(&person).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert_eq!(repo.get_person(id).await.unwrap().last_name, "Doe");
    }

    #[tokio::test]
    async fn test_delete_is_soft_and_idempotent() {
        let repo = repo().await;
        let id = repo.create_person(&alice()).await.unwrap();

        repo.delete_person(id).await.unwrap();
        repo.delete_person(id).await.unwrap();

        let person = repo.get_person(id).await.unwrap();
        assert!(person.deleted);
    }

    #[tokio::test]
    async fn test_delete_never_existing_is_not_found() {
        let repo = repo().await;
        let result = repo.delete_person(Uuid::new_v4()).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters_by_deleted_flag() {
        let repo = repo().await;
        let kept = repo.create_person(&alice()).await.unwrap();
        let removed = repo.create_person(&NewPerson::new("Bob", "Roe")).await.unwrap();
        repo.delete_person(removed).await.unwrap();

        let live = repo.list_people(&Filter::default()).await.unwrap();
        let gone = repo.list_people(&Filter::new(0, 10, true)).await.unwrap();

        assert_eq!(live.iter().map(|p| p.id).collect::<Vec<_>>(), vec![kept]);
        assert_eq!(gone.iter().map(|p| p.id).collect::<Vec<_>>(), vec![removed]);
    }

    #[tokio::test]
    async fn test_list_orders_by_id_and_windows() {
        let repo = repo().await;
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(
                repo.create_person(&NewPerson::new(format!("Name{i}"), "Doe"))
                    .await
                    .unwrap(),
            );
        }
        ids.sort_by_key(|id| format_id(*id));

        let page = repo.list_people(&Filter::new(1, 2, false)).await.unwrap();

        assert_eq!(page.iter().map(|p| p.id).collect::<Vec<_>>(), ids[1..3]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_state() {
        let repo = repo().await;

        // The CHECK constraint fires inside the transaction.
        let result = repo
            .conn
            .call(|conn| {
                run_in_transaction(conn, |tx| {
                    tx.execute(
                        "INSERT INTO peoples (first_name, last_name) VALUES ('A', 'B')",
                        [],
                    )?;
                    tx.execute(
                        "INSERT INTO peoples (first_name, last_name) VALUES ('', 'B')",
                        [],
                    )?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, "new"));

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(repo.list_people(&Filter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_rollback_surfaces_both_causes() {
        let repo = repo().await;

        // Ending the transaction early makes the explicit rollback fail.
        let result = repo
            .conn
            .call(|conn| {
                run_in_transaction(conn, |tx| {
                    tx.execute_batch("ROLLBACK")?;
                    Err::<(), _>(rusqlite::Error::QueryReturnedNoRows)
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, "new"));

        match result {
            Err(RepositoryError::RollbackFailed { cause, reason }) => {
                assert_eq!(cause, "Query returned no rows");
                assert!(reason.contains("no transaction is active"), "{reason}");
            }
            other => panic!("expected RollbackFailed, got {other:?}"),
        }
        assert!(repo.list_people(&Filter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_database_persists_across_connections() {
        let path = std::env::temp_dir().join(format!("peoples-{}.db", Uuid::new_v4()));
        let path_str = path.to_string_lossy().to_string();

        let id = {
            let repo = SqliteRepository::new(&path_str).await.unwrap();
            repo.create_person(&alice()).await.unwrap()
        };
        let reopened = SqliteRepository::new(&path_str).await.unwrap();

        assert_eq!(reopened.get_person(id).await.unwrap().first_name, "Alice");
        let _ = std::fs::remove_file(&path);
    }
}
