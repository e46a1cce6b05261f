//! Name-inference contract.
//!
//! The HTTP client lives in the binary; this module owns the response
//! shapes of the three inference services and the rules that turn them into
//! [`Demographics`].

mod error;
mod responses;
mod traits;

pub use error::{InferenceError, Result};
pub use responses::{
    resolve_demographics, AgeResponse, CountryCandidate, Demographics, GenderResponse,
    NationResponse,
};
pub use traits::Enricher;
