//! Response bodies of the age, gender and nationality services and the
//! aggregation rules applied to them.

use serde::{Deserialize, Serialize};

use crate::person::Sex;

use super::{InferenceError, Result};

/// Body of the age service: `{"age": 30}`. `age` is `null` for unknown names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeResponse {
    #[serde(default)]
    pub age: Option<u32>,
}

/// Body of the gender service: `{"gender": "female"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderResponse {
    #[serde(default)]
    pub gender: Option<String>,
}

/// Body of the nationality service: `{"country": [{"country_id": "US"}]}`.
///
/// Candidates arrive ordered by probability, most likely first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NationResponse {
    #[serde(default)]
    pub country: Vec<CountryCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCandidate {
    pub country_id: String,
    #[serde(default)]
    pub probability: f64,
}

/// Aggregated enrichment result for one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: u32,
    pub sex: Sex,
    /// Empty when the nationality service had no candidates.
    pub nation: String,
}

/// Combines the three service responses into [`Demographics`].
///
/// A missing age or a missing/unrecognised gender means the name cannot be
/// resolved. Nationality is best-effort: no candidates yields an empty
/// nation.
pub fn resolve_demographics(
    name: &str,
    age: AgeResponse,
    gender: GenderResponse,
    nation: NationResponse,
) -> Result<Demographics> {
    let sex = match gender.gender.as_deref() {
        Some("male") => Sex::Male,
        Some("female") => Sex::Female,
        Some("") | None => {
            return Err(InferenceError::unresolvable(
                name,
                "gender service returned no gender",
            ))
        }
        Some(other) => {
            return Err(InferenceError::unresolvable(
                name,
                format!("unrecognised gender `{other}`"),
            ))
        }
    };

    let age = age
        .age
        .ok_or_else(|| InferenceError::unresolvable(name, "age service returned no age"))?;

    let nation = nation
        .country
        .into_iter()
        .next()
        .map(|candidate| candidate.country_id)
        .unwrap_or_default();

    Ok(Demographics { age, sex, nation })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age(value: Option<u32>) -> AgeResponse {
        AgeResponse { age: value }
    }

    fn gender(value: Option<&str>) -> GenderResponse {
        GenderResponse {
            gender: value.map(str::to_string),
        }
    }

    fn nation(ids: &[&str]) -> NationResponse {
        NationResponse {
            country: ids
                .iter()
                .map(|id| CountryCandidate {
                    country_id: id.to_string(),
                    probability: 0.5,
                })
                .collect(),
        }
    }

    #[test]
    fn test_resolves_all_attributes() {
        let result =
            resolve_demographics("Alice", age(Some(30)), gender(Some("female")), nation(&["US"]))
                .unwrap();

        assert_eq!(
            result,
            Demographics {
                age: 30,
                sex: Sex::Female,
                nation: "US".to_string(),
            }
        );
    }

    #[test]
    fn test_picks_first_country_candidate() {
        let result = resolve_demographics(
            "Dmitriy",
            age(Some(44)),
            gender(Some("male")),
            nation(&["RU", "UA", "BY"]),
        )
        .unwrap();

        assert_eq!(result.nation, "RU");
    }

    #[test]
    fn test_empty_country_list_is_not_an_error() {
        let result =
            resolve_demographics("Alice", age(Some(30)), gender(Some("female")), nation(&[]))
                .unwrap();

        assert_eq!(result.nation, "");
    }

    #[test]
    fn test_missing_gender_is_unresolvable() {
        let result = resolve_demographics("Qwzx", age(Some(30)), gender(None), nation(&["US"]));
        assert!(matches!(
            result,
            Err(InferenceError::UnresolvableName { .. })
        ));
    }

    #[test]
    fn test_empty_gender_is_unresolvable() {
        let result = resolve_demographics("Qwzx", age(Some(30)), gender(Some("")), nation(&[]));
        assert!(matches!(
            result,
            Err(InferenceError::UnresolvableName { .. })
        ));
    }

    #[test]
    fn test_missing_age_is_unresolvable() {
        let result = resolve_demographics("Qwzx", age(None), gender(Some("male")), nation(&[]));
        assert!(matches!(
            result,
            Err(InferenceError::UnresolvableName { .. })
        ));
    }

    #[test]
    fn test_parses_service_bodies() {
        let age: AgeResponse =
            serde_json::from_str(r#"{"count":12,"name":"alice","age":30}"#).unwrap();
        let gender: GenderResponse =
            serde_json::from_str(r#"{"count":9,"name":"alice","gender":"female","probability":0.98}"#)
                .unwrap();
        let nation: NationResponse = serde_json::from_str(
            r#"{"count":4,"name":"alice","country":[{"country_id":"US","probability":0.12}]}"#,
        )
        .unwrap();

        assert_eq!(age.age, Some(30));
        assert_eq!(gender.gender.as_deref(), Some("female"));
        assert_eq!(nation.country[0].country_id, "US");
    }

    #[test]
    fn test_null_fields_parse_as_none() {
        let age: AgeResponse = serde_json::from_str(r#"{"age":null}"#).unwrap();
        let gender: GenderResponse = serde_json::from_str(r#"{"gender":null}"#).unwrap();

        assert_eq!(age.age, None);
        assert_eq!(gender.gender, None);
    }
}
