// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error on host connection: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Response writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
}
