//! Facade: the four public operations, composed from the upstream client
//! and the flattening transformer. Pure composition — no caching, no
//! retries, no rate limiting — and every error kind crosses this boundary
//! unchanged.

use crate::error::PortalError;
use crate::models::{FlatCharacter, SearchResult, StatusesResponse};
use crate::transform::flatten;
use crate::upstream::UpstreamClient;

pub struct CharacterService {
    client: UpstreamClient,
}

impl CharacterService {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// One uniformly random character, flattened.
    pub async fn random_character(&self) -> Result<FlatCharacter, PortalError> {
        let raw = self.client.fetch_random().await?;
        flatten(raw)
    }

    /// One uniformly random character among those matching `status`.
    pub async fn character_by_status(&self, status: &str) -> Result<FlatCharacter, PortalError> {
        let raw = self.client.fetch_by_status(status).await?;
        flatten(raw)
    }

    /// The fixed status vocabulary. Infallible, no network call.
    pub fn character_statuses(&self) -> StatusesResponse {
        StatusesResponse {
            statuses: self.client.list_statuses(),
        }
    }

    /// Name search: every result flattened, upstream order preserved,
    /// `total` equal to the number of results.
    pub async fn search_characters(&self, query: &str) -> Result<SearchResult, PortalError> {
        let page = self.client.search_by_name(query).await?;

        let result = page
            .results
            .into_iter()
            .map(flatten)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchResult {
            total: result.len(),
            result,
        })
    }
}
