//! Upstream client for the public character API.
//!
//! One pooled reqwest client per `UpstreamClient`, with independent connect
//! and read timeouts honored on every call. Transport failures and non-200
//! responses map to the typed errors in [`crate::error`]; there is no retry
//! loop — a failed call surfaces immediately and the caller decides.

use std::time::Duration;

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::UpstreamConfig;
use crate::error::PortalError;
use crate::models::{CharacterPage, UpstreamCharacter};

/// Inclusive bounds of the upstream character-id space.
pub const CHARACTER_ID_MIN: u32 = 1;
pub const CHARACTER_ID_MAX: u32 = 826;

/// The fixed status vocabulary. Not derived from the upstream.
pub const CHARACTER_STATUSES: [&str; 3] = ["alive", "dead", "unknown"];

/// Injectable random source so tests can pin the selection.
pub trait RandomSource: Send + Sync {
    /// Uniform pick in `[min, max]` inclusive.
    fn pick_id(&self, min: u32, max: u32) -> u32;

    /// Uniform index in `[0, len)`. `len` is never zero when called.
    fn pick_index(&self, len: usize) -> usize;
}

/// Default source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick_id(&self, min: u32, max: u32) -> u32 {
        rand::rng().random_range(min..=max)
    }

    fn pick_index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// HTTP client for the upstream character endpoint family.
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    rng: Box<dyn RandomSource>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, PortalError> {
        Self::with_base_url(config, config.base_url.clone())
    }

    /// Create a client with a custom base URL (for testing / integration).
    pub fn with_base_url(config: &UpstreamConfig, base_url: String) -> Result<Self, PortalError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .build()
            .map_err(PortalError::from_transport)?;

        Ok(Self {
            client,
            base_url,
            rng: Box::new(ThreadRngSource),
        })
    }

    /// Replace the random source (tests pin ids and indices through this).
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Fetch one character by a uniformly random id in
    /// `[CHARACTER_ID_MIN, CHARACTER_ID_MAX]`.
    pub async fn fetch_random(&self) -> Result<UpstreamCharacter, PortalError> {
        let id = self.rng.pick_id(CHARACTER_ID_MIN, CHARACTER_ID_MAX);
        let url = format!("{}/character/{}", self.base_url, id);

        tracing::debug!(id, "fetching random character");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(PortalError::from_transport)?;

        decode(check_status(response)?).await
    }

    /// Fetch a uniformly random character among those matching `status`.
    /// An empty result page is `NotFound`.
    pub async fn fetch_by_status(&self, status: &str) -> Result<UpstreamCharacter, PortalError> {
        let url = format!("{}/character", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("status", status)])
            .send()
            .await
            .map_err(PortalError::from_transport)?;

        let page: CharacterPage = decode(check_status(response)?).await?;

        if page.results.is_empty() {
            return Err(PortalError::NotFound(format!(
                "no characters with status '{}'",
                status
            )));
        }

        let mut results = page.results;
        let index = self.rng.pick_index(results.len());
        Ok(results.swap_remove(index))
    }

    /// The fixed status set. Performs no network call.
    pub fn list_statuses(&self) -> Vec<String> {
        CHARACTER_STATUSES.iter().map(|s| s.to_string()).collect()
    }

    /// Search characters by name substring. Queries shorter than two
    /// characters after trimming are rejected before any network call.
    /// An empty result page is a valid outcome at this layer.
    pub async fn search_by_name(&self, query: &str) -> Result<CharacterPage, PortalError> {
        let trimmed = query.trim();
        if trimmed.chars().count() < 2 {
            return Err(PortalError::Validation(
                "search query must be at least 2 characters".to_string(),
            ));
        }

        let url = format!("{}/character", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("name", trimmed)])
            .send()
            .await
            .map_err(PortalError::from_transport)?;

        decode(check_status(response)?).await
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PortalError> {
    let status = response.status();
    if status != StatusCode::OK {
        tracing::error!(status = status.as_u16(), "upstream returned non-200");
        return Err(PortalError::Upstream {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Read the body and parse it. A 200 whose body does not match the expected
/// shape violates the upstream contract and maps to `MalformedUpstream`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PortalError> {
    let body = response
        .bytes()
        .await
        .map_err(PortalError::from_transport)?;
    serde_json::from_slice(&body).map_err(|e| PortalError::MalformedUpstream(e.to_string()))
}
