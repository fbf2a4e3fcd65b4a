//! Error types for Claude API calls

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeError {
    /// No key in the keyring or the environment
    #[error("No Claude API key. Use :claude-key <key> or set ANTHROPIC_API_KEY")]
    MissingKey,

    /// Key does not look like an Anthropic key
    #[error("Invalid API key format. Key should start with 'sk-ant-'")]
    InvalidKey,

    #[error("Keyring unavailable: {0}")]
    Keyring(String),

    /// Network or transport failure, including timeouts
    #[error("Claude request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Key rejected by the API
    #[error("Claude rejected the API key")]
    Unauthorized,

    #[error("Rate limited. Retry after {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    /// Any other non-success response
    #[error("Claude API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the Messages API shape
    #[error("Unexpected Claude response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response had no text content
    #[error("Claude returned an empty response")]
    Empty,
}

impl ClaudeError {
    /// Check if retrying could help
    pub fn is_retryable(&self) -> bool {
        match self {
            ClaudeError::Request(_) | ClaudeError::RateLimited { .. } => true,
            ClaudeError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if the user must supply a new key
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            ClaudeError::MissingKey | ClaudeError::InvalidKey | ClaudeError::Unauthorized
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ClaudeError::RateLimited { retry_after_seconds: 5 }.is_retryable());
        assert!(ClaudeError::Api { status: 529, message: String::new() }.is_retryable());
        assert!(!ClaudeError::Empty.is_retryable());
        assert!(ClaudeError::Unauthorized.requires_reauth());
        assert!(!ClaudeError::Api { status: 500, message: String::new() }.requires_reauth());
    }
}
