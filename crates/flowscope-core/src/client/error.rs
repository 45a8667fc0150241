use thiserror::Error;

use crate::traversal::TraversalError;

/// Errors that can occur while talking to a NiFi server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected content type '{content_type}': {body}")]
    UnexpectedContentType { content_type: String, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Response is missing '{0}'")]
    MissingField(String),

    #[error(transparent)]
    Format(#[from] TraversalError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}
