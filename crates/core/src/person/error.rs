use thiserror::Error;

/// Errors that can occur when validating person data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersonError {
    #[error("First name cannot be empty")]
    EmptyFirstName,
    #[error("Last name cannot be empty")]
    EmptyLastName,
    #[error("Invalid sex: {0}")]
    InvalidSex(String),
    #[error("Sex must be male or female")]
    UnknownSex,
}
