//! Error types for Bluesky API calls

use thiserror::Error;

use crate::identity::IdentityError;

#[derive(Debug, Error)]
pub enum BlueskyError {
    /// Network or transport failure
    #[error("Bluesky request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// XRPC error response
    #[error("Bluesky API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Login rejected
    #[error("Invalid handle or app password")]
    InvalidCredentials,

    /// Handle or actor does not exist
    #[error("Not found on Bluesky: {0}")]
    NotFound(String),

    /// Server returned an identifier we cannot use
    #[error(transparent)]
    InvalidDid(#[from] IdentityError),
}

impl BlueskyError {
    /// Check if retrying could help
    pub fn is_retryable(&self) -> bool {
        match self {
            BlueskyError::Request(_) => true,
            BlueskyError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if the user must log in again
    pub fn requires_reauth(&self) -> bool {
        matches!(self, BlueskyError::InvalidCredentials | BlueskyError::Api { status: 401, .. })
    }
}
