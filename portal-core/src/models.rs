//! Data model: the upstream's nested character shape on the way in, the
//! flat response shape on the way out. Nothing here is persisted — every
//! value lives for a single request/response cycle.

use serde::{Deserialize, Serialize};

/// A nested `{ "name": ... }` reference (the upstream's `origin` and
/// `location` sub-objects).
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// One character record as the upstream returns it. `origin` and `location`
/// are required by the upstream contract but modeled as `Option` so their
/// absence surfaces as `MalformedUpstream` during flattening instead of a
/// deserialization failure with no context.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCharacter {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: String,
    pub origin: Option<NamedRef>,
    pub location: Option<NamedRef>,
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
    pub created: String,
}

/// A list page from `GET {base}/character?...`. The upstream omits
/// `results` entirely on empty filter matches.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterPage {
    #[serde(default)]
    pub results: Vec<UpstreamCharacter>,
}

/// The flattened character record — the wire contract downstream consumers
/// depend on. Nested sub-objects become scalar fields and the episode list
/// becomes a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatCharacter {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: String,
    pub location: String,
    pub image: String,
    #[serde(rename = "episodeCount")]
    pub episode_count: usize,
    pub created: String,
}

/// Name-search result: `total` always equals `result.len()`, and `result`
/// preserves the upstream's returned order.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub total: usize,
    pub result: Vec<FlatCharacter>,
}

/// The fixed set of character statuses. Hardcoded, not derived from the
/// upstream.
#[derive(Debug, Clone, Serialize)]
pub struct StatusesResponse {
    pub statuses: Vec<String>,
}
