// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
    #[error("Invalid API base URL: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),
    #[error("API key must not be empty when set")]
    EmptyApiKey,
}
