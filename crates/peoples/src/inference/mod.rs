//! HTTP client for the age, gender and nationality inference services.

mod client;

pub use client::{InferenceClient, InferenceEndpoints};
