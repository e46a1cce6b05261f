//! Name-inference client.
//!
//! Issues the three lookups concurrently and aggregates them with
//! [`resolve_demographics`]. No retries: a failed sub-call fails the whole
//! enrichment.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use peoples_core::enrichment::{
    resolve_demographics, AgeResponse, Demographics, Enricher, GenderResponse, InferenceError,
    NationResponse, Result,
};

/// Base URLs of the three inference services. The name is appended as the
/// `name` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceEndpoints {
    pub age_url: String,
    pub gender_url: String,
    pub nation_url: String,
}

/// [`Enricher`] backed by the public inference HTTP APIs.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    endpoints: InferenceEndpoints,
}

impl InferenceClient {
    /// Creates a client whose every request is bounded by `timeout`.
    pub fn new(endpoints: InferenceEndpoints, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoints })
    }

    async fn lookup<T: DeserializeOwned>(&self, service: &str, url: &str, name: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable(format!("{service} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Unavailable(format!(
                "{service} service returned {status}"
            )));
        }

        response.json().await.map_err(|e| {
            InferenceError::Unavailable(format!("failed to parse {service} response: {e}"))
        })
    }
}

#[async_trait]
impl Enricher for InferenceClient {
    async fn enrich(&self, name: &str) -> Result<Demographics> {
        let (age, gender, nation) = tokio::try_join!(
            self.lookup::<AgeResponse>("age", &self.endpoints.age_url, name),
            self.lookup::<GenderResponse>("gender", &self.endpoints.gender_url, name),
            self.lookup::<NationResponse>("nation", &self.endpoints.nation_url, name),
        )?;

        let demographics = resolve_demographics(name, age, gender, nation)?;
        tracing::debug!(
            name,
            age = demographics.age,
            sex = %demographics.sex,
            nation = %demographics.nation,
            "Name enriched"
        );
        Ok(demographics)
    }
}
