use serde::{Deserialize, Serialize};

use super::{QueueError, ValidationError};

/// Record published for a message that could not be processed.
///
/// Wire format: `{"message": "...", "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentFailure {
    pub message: String,
    pub error: String,
}

impl EnrichmentFailure {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: error.into(),
        }
    }

    /// The payload could not be decoded at all.
    pub fn malformed_payload(cause: impl ToString) -> Self {
        Self::new("failed to unmarshal payload", cause.to_string())
    }

    /// A required field was missing or empty.
    pub fn validation(error: ValidationError) -> Self {
        Self::new("validation failed", error.to_string())
    }

    /// The inference services could not enrich the name.
    pub fn enrichment_failed(cause: impl ToString) -> Self {
        Self::new("enrichment failed", cause.to_string())
    }

    /// The enriched record could not be written.
    pub fn persistence_failed(cause: impl ToString) -> Self {
        Self::new("persistence failed", cause.to_string())
    }

    /// Encodes the record for the failure topic.
    pub fn to_json(&self) -> Result<Vec<u8>, QueueError> {
        serde_json::to_vec(self).map_err(|e| QueueError::Serialization(e.to_string()))
    }
}
