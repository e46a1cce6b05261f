//! API request types for person operations.
//!
//! Pure data types with no I/O. The REST layer deserializes these and turns
//! them into domain values, rejecting anything the store would refuse.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Filter, NewPerson, Person, Sex};
use super::PersonError;

/// Request payload for creating a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    pub sex: Sex,
    #[serde(default)]
    pub nation: String,
}

impl CreatePersonRequest {
    /// Validate and convert into the fields handed to the store.
    ///
    /// API callers must state the sex explicitly; `unknown` is reserved for
    /// records the pipeline could not fully resolve.
    pub fn into_new_person(self) -> Result<NewPerson, PersonError> {
        if !self.sex.is_known() {
            return Err(PersonError::UnknownSex);
        }
        let new = NewPerson {
            first_name: self.first_name,
            last_name: self.last_name,
            patronymic: self.patronymic,
            age: self.age,
            sex: self.sex,
            nation: self.nation,
        };
        new.validate()?;
        Ok(new)
    }
}

/// Request payload for replacing a person's mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePersonRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    pub sex: Sex,
    #[serde(default)]
    pub nation: String,
    #[serde(default)]
    pub deleted: bool,
}

impl UpdatePersonRequest {
    /// Validate and convert into the full record for `id`.
    pub fn into_person(self, id: Uuid) -> Result<Person, PersonError> {
        if !self.sex.is_known() {
            return Err(PersonError::UnknownSex);
        }
        let person = Person {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            patronymic: self.patronymic,
            age: self.age,
            sex: self.sex,
            nation: self.nation,
            deleted: self.deleted,
        };
        person.validate()?;
        Ok(person)
    }
}

/// Query parameters for listing people.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListPeopleQuery {
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub deleted: Option<bool>,
}

impl ListPeopleQuery {
    pub fn into_filter(self) -> Filter {
        Filter::new(
            self.offset.unwrap_or(0),
            self.limit.unwrap_or(Filter::DEFAULT_LIMIT),
            self.deleted.unwrap_or(false),
        )
    }
}

/// Response body returned after a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPerson {
    pub id: Uuid,
}
