// Standard library
use std::fmt;

// 3rd party crates
use reqwest::StatusCode;
use thiserror::Error;

/// Custom error type for BunnyCDN API operations.
#[derive(Debug, Error)]
pub enum BunnyCdnError {
    #[error("API key is not set")]
    InvalidApiKey,

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP client error: {0}")]
    HttpClientBuild(reqwest::Error),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Request '{0}' was cancelled")]
    Cancelled(&'static str),

    #[error("Failed to decode response of '{operation}': {source}")]
    Decode {
        operation: &'static str,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Status(#[from] StatusError),
}

impl BunnyCdnError {
    /// Returns the HTTP status when the error came from a received response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BunnyCdnError::Status(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// What a failed request was about. Used to name the resource in 404 messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSubject {
    Pullzone(i64),
    Hostname(String),
}

/// A response was received but its status code was not the expected one.
#[derive(Debug)]
pub struct StatusError {
    pub status: StatusCode,
    pub subject: StatusSubject,
    /// Raw response body, kept only where it helps diagnose the failure.
    pub body: Option<String>,
}

impl StatusError {
    pub fn pullzone(status: StatusCode, id: i64) -> Self {
        Self {
            status,
            subject: StatusSubject::Pullzone(id),
            body: None,
        }
    }

    pub fn hostname(status: StatusCode, hostname: &str) -> Self {
        Self {
            status,
            subject: StatusSubject::Hostname(hostname.to_string()),
            body: None,
        }
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    fn message(&self) -> String {
        match self.status.as_u16() {
            400 => "Invalid request".to_string(),
            401 => "Request authorization failed".to_string(),
            404 => match &self.subject {
                StatusSubject::Pullzone(id) => format!("Pull zone with ID {} does not exist", id),
                StatusSubject::Hostname(name) => format!("Hostname {} does not exist", name),
            },
            code if code >= 500 => format!("BunnyCDN server error. status code: {}", code),
            code => format!("Unexpected status code {}", code),
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{}: {}", self.message(), body),
            None => f.write_str(&self.message()),
        }
    }
}

impl std::error::Error for StatusError {}
