pub mod config;
pub mod error;
pub mod facade;
pub mod models;
pub mod transform;
pub mod upstream;

pub use config::{HttpConfig, PortalConfig, UpstreamConfig};
pub use error::PortalError;
pub use facade::CharacterService;
pub use models::{CharacterPage, FlatCharacter, SearchResult, StatusesResponse, UpstreamCharacter};
pub use transform::flatten;
pub use upstream::{
    RandomSource, ThreadRngSource, UpstreamClient, CHARACTER_ID_MAX, CHARACTER_ID_MIN,
    CHARACTER_STATUSES,
};
