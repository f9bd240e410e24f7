use thiserror::Error;

pub type Result<T, E = GambitError> = std::result::Result<T, E>;

/// Unified error type covering common failure scenarios across subsystems.
#[derive(Debug, Error)]
pub enum GambitError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error("rate limited by upstream API, retry after a minute")]
    RateLimited,
    #[error("operational error: {0}")]
    Ops(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
