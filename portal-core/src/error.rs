use thiserror::Error;

/// Error taxonomy for the facade. Every variant is terminal for the current
/// operation — nothing is retried internally, and the HTTP status mapping
/// happens only in portal-server.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("Upstream connection failed: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("Malformed upstream payload: {0}")]
    MalformedUpstream(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl PortalError {
    /// Classify a reqwest transport failure. Timeouts (connect or read) map
    /// to `Timeout`; everything else at the transport level is `Connection`.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PortalError::Timeout(err)
        } else {
            PortalError::Connection(err)
        }
    }
}
