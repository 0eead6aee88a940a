/// Core error type for the relay bot.
///
/// The adapter crate maps its specific errors into this type so the core can
/// handle failures consistently (user-facing message vs retryable).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("telegram api error: {0}")]
    Api(String),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// Transient failures are retried with fixed backoff; everything else
    /// propagates immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
