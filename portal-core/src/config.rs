use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct PortalConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Upstream character API settings. Connect and read timeouts are
/// independent knobs, honored on every outbound call.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rickandmortyapi.com/api".to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }
}

impl PortalConfig {
    /// Load from a TOML file, with `PORTAL_*` environment overrides
    /// (e.g. `PORTAL_UPSTREAM__BASE_URL`).
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("PORTAL").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}
