use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PersonError;

/// Sex as reported by the inference services or supplied by an API caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    /// Returns the lowercase storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unknown => "unknown",
        }
    }

    /// Returns true if the sex is male or female.
    pub fn is_known(&self) -> bool {
        !matches!(self, Sex::Unknown)
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = PersonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            "unknown" => Ok(Sex::Unknown),
            other => Err(PersonError::InvalidSex(other.to_string())),
        }
    }
}

/// A person record as held by the durable store.
///
/// The cache keeps a serialized copy of this type, so its JSON shape is
/// also the cache value format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    /// Estimated age; `None` until enriched.
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub sex: Sex,
    /// Inferred country code, empty when nothing could be inferred.
    #[serde(default)]
    pub nation: String,
    #[serde(default)]
    pub deleted: bool,
}

impl Person {
    /// Builds the stored record for a freshly created person.
    pub fn from_new(id: Uuid, new: NewPerson) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            patronymic: new.patronymic,
            age: new.age,
            sex: new.sex,
            nation: new.nation,
            deleted: false,
        }
    }

    /// Checks the invariants every stored record must hold.
    pub fn validate(&self) -> Result<(), PersonError> {
        validate_names(&self.first_name, &self.last_name)
    }
}

/// Fields supplied when creating a person. The identifier is assigned by
/// the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub nation: String,
}

impl NewPerson {
    /// Creates a person with only the name fields set.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn with_patronymic(mut self, patronymic: impl Into<String>) -> Self {
        self.patronymic = Some(patronymic.into());
        self
    }

    /// Sets the enrichment attributes in one go.
    pub fn with_demographics(mut self, age: u32, sex: Sex, nation: impl Into<String>) -> Self {
        self.age = Some(age);
        self.sex = sex;
        self.nation = nation.into();
        self
    }

    /// Checks the invariants a record must hold before reaching the store.
    pub fn validate(&self) -> Result<(), PersonError> {
        validate_names(&self.first_name, &self.last_name)
    }
}

fn validate_names(first_name: &str, last_name: &str) -> Result<(), PersonError> {
    if first_name.is_empty() {
        return Err(PersonError::EmptyFirstName);
    }
    if last_name.is_empty() {
        return Err(PersonError::EmptyLastName);
    }
    Ok(())
}

/// Window over the stored people, used only by bulk reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub deleted: bool,
}

fn default_limit() -> u32 {
    Filter::DEFAULT_LIMIT
}

impl Filter {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(offset: u32, limit: u32, deleted: bool) -> Self {
        Self {
            offset,
            limit,
            deleted,
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT, false)
    }
}
