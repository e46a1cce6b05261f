use thiserror::Error;

/// Errors returned by name enrichment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// The services answered but could not attribute the name.
    #[error("cannot resolve name `{name}`: {reason}")]
    UnresolvableName { name: String, reason: String },
    /// A lookup failed at the transport, status or decoding level.
    #[error("inference service unavailable: {0}")]
    Unavailable(String),
}

impl InferenceError {
    pub fn unresolvable(name: &str, reason: impl Into<String>) -> Self {
        InferenceError::UnresolvableName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for enrichment operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
