// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankerError>;

/// Every failure a fetch or ranking call can surface. None of them are retried.
#[derive(Debug, Error)]
pub enum RankerError {
    /// Missing or invalid credentials, unsupported platform or source type.
    #[error("Config error: {0}")]
    Config(String),

    /// Transport failure or a non-2xx status.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered 2xx but reported an error in the body.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RankerError {
    fn from(err: reqwest::Error) -> Self {
        RankerError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for RankerError {
    fn from(err: serde_json::Error) -> Self {
        RankerError::Parse(err.to_string())
    }
}
