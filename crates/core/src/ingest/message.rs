//! Queue message types and payload decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enrichment::Demographics;
use crate::person::NewPerson;

use super::EnrichmentFailure;

/// A message read from the queue, with the coordinates needed to commit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub payload: Option<Vec<u8>>,
}

/// Payload of an enrichment-request message as it arrives on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub patronymic: Option<String>,
}

/// Why an enrichment request was rejected before enrichment.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field not exists")]
    RequiredFieldNotExists,
    #[error("required field is empty")]
    RequiredFieldIsEmpty,
}

/// An enrichment request whose required fields are present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub first_name: String,
    pub last_name: String,
    pub patronymic: Option<String>,
}

impl EnrichmentRequest {
    /// Checks that both names are present and non-empty.
    ///
    /// Absence is reported before emptiness, so `{"first_name": ""}` is a
    /// missing-field error.
    pub fn validate(self) -> Result<ValidatedRequest, ValidationError> {
        let (Some(first_name), Some(last_name)) = (self.first_name, self.last_name) else {
            return Err(ValidationError::RequiredFieldNotExists);
        };
        if first_name.is_empty() || last_name.is_empty() {
            return Err(ValidationError::RequiredFieldIsEmpty);
        }
        Ok(ValidatedRequest {
            first_name,
            last_name,
            patronymic: self.patronymic,
        })
    }
}

impl ValidatedRequest {
    /// The name sent to the inference services.
    pub fn inference_name(&self) -> &str {
        &self.first_name
    }

    /// Builds the record to persist from the enrichment result.
    pub fn into_new_person(self, demographics: Demographics) -> NewPerson {
        NewPerson {
            first_name: self.first_name,
            last_name: self.last_name,
            patronymic: self.patronymic,
            age: Some(demographics.age),
            sex: demographics.sex,
            nation: demographics.nation,
        }
    }
}

/// Decodes and validates a message payload.
///
/// Returns the failure record to publish when the message must be rejected.
pub fn decode_request(payload: Option<&[u8]>) -> Result<ValidatedRequest, EnrichmentFailure> {
    let Some(bytes) = payload else {
        return Err(EnrichmentFailure::malformed_payload("message has no payload"));
    };
    let request: EnrichmentRequest =
        serde_json::from_slice(bytes).map_err(EnrichmentFailure::malformed_payload)?;
    request.validate().map_err(EnrichmentFailure::validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Sex;

    #[test]
    fn test_decode_valid_request() {
        let request =
            decode_request(Some(br#"{"first_name":"Alice","last_name":"Doe"}"#)).unwrap();

        assert_eq!(
            request,
            ValidatedRequest {
                first_name: "Alice".to_string(),
                last_name: "Doe".to_string(),
                patronymic: None,
            }
        );
        assert_eq!(request.inference_name(), "Alice");
    }

    #[test]
    fn test_decode_keeps_patronymic() {
        let request = decode_request(Some(
            br#"{"first_name":"Ivan","last_name":"Petrov","patronymic":"Sergeevich"}"#,
        ))
        .unwrap();

        assert_eq!(request.patronymic.as_deref(), Some("Sergeevich"));
    }

    #[test]
    fn test_decode_empty_first_name() {
        let failure = decode_request(Some(br#"{"first_name":"","last_name":"Doe"}"#)).unwrap_err();

        assert_eq!(failure.message, "validation failed");
        assert_eq!(failure.error, "required field is empty");
    }

    #[test]
    fn test_decode_missing_last_name() {
        let failure = decode_request(Some(br#"{"first_name":"Alice"}"#)).unwrap_err();
        assert_eq!(failure.error, "required field not exists");
    }

    #[test]
    fn test_decode_null_name_counts_as_missing() {
        let failure =
            decode_request(Some(br#"{"first_name":null,"last_name":"Doe"}"#)).unwrap_err();
        assert_eq!(failure.error, "required field not exists");
    }

    #[test]
    fn test_decode_malformed_json() {
        let failure = decode_request(Some(b"{not json")).unwrap_err();
        assert_eq!(failure.message, "failed to unmarshal payload");
        assert!(!failure.error.is_empty());
    }

    #[test]
    fn test_decode_wrong_type() {
        let failure = decode_request(Some(br#"{"first_name":42,"last_name":"Doe"}"#)).unwrap_err();
        assert_eq!(failure.message, "failed to unmarshal payload");
    }

    #[test]
    fn test_decode_missing_payload() {
        let failure = decode_request(None).unwrap_err();
        assert_eq!(
            failure,
            EnrichmentFailure::malformed_payload("message has no payload")
        );
    }

    #[test]
    fn test_into_new_person_applies_demographics() {
        let request = decode_request(Some(br#"{"first_name":"Alice","last_name":"Doe"}"#)).unwrap();
        let person = request.into_new_person(Demographics {
            age: 30,
            sex: Sex::Female,
            nation: "US".to_string(),
        });

        assert_eq!(
            person,
            NewPerson::new("Alice", "Doe").with_demographics(30, Sex::Female, "US")
        );
    }
}
