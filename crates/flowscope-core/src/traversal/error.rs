use thiserror::Error;

/// Errors raised while walking a status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    /// The response did not have the structure a status snapshot must have.
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

impl TraversalError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        TraversalError::InvalidFormat(message.into())
    }
}
