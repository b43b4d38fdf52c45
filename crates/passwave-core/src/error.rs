//! Error types for Passwave

use thiserror::Error;

/// Result type alias for Passwave operations
pub type PasswaveResult<T> = Result<T, PasswaveError>;

/// Main error type for Passwave
#[derive(Error, Debug)]
pub enum PasswaveError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Invalid sender: {0}")]
    Sender(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PasswaveError {
    /// Create a new unauthorized (logged out) error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a new broker error
    pub fn broker(msg: impl Into<String>) -> Self {
        Self::Broker(msg.into())
    }

    /// Create a new sender error
    pub fn sender(msg: impl Into<String>) -> Self {
        Self::Sender(msg.into())
    }

    /// Create a new store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
