//! API key management using system keyring

use keyring::Entry;
use tracing::debug;

use super::error::ClaudeError;

/// Service name for keyring storage
const SERVICE_NAME: &str = "skyspace";
/// Entry name for the API key
const API_KEY_ENTRY: &str = "anthropic-api-key";
/// Environment variable consulted when the keyring has no key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Manages Claude API key storage in system keyring
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Get the API key from system keyring
    pub fn get_api_key() -> Result<String, ClaudeError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| ClaudeError::Keyring(e.to_string()))?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => ClaudeError::MissingKey,
            _ => ClaudeError::Keyring(e.to_string()),
        })
    }

    /// Key from the keyring, else from `ANTHROPIC_API_KEY`
    pub fn resolve_api_key() -> Result<String, ClaudeError> {
        match Self::get_api_key() {
            Ok(key) => Ok(key),
            Err(e) => {
                debug!("No keyring API key ({}), checking {}", e, API_KEY_ENV);
                Self::key_from_env(std::env::var(API_KEY_ENV).ok())
            }
        }
    }

    fn key_from_env(value: Option<String>) -> Result<String, ClaudeError> {
        let key = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        match key {
            Some(key) if Self::validate_key_format(&key) => Ok(key),
            Some(_) => Err(ClaudeError::InvalidKey),
            None => Err(ClaudeError::MissingKey),
        }
    }

    /// Store the API key in system keyring
    pub fn set_api_key(key: &str) -> Result<(), ClaudeError> {
        // Validate key format
        if !Self::validate_key_format(key) {
            return Err(ClaudeError::InvalidKey);
        }

        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| ClaudeError::Keyring(e.to_string()))?;

        entry.set_password(key).map_err(|e| ClaudeError::Keyring(e.to_string()))
    }

    /// Validate API key format
    pub fn validate_key_format(key: &str) -> bool {
        // Anthropic API keys start with "sk-ant-"
        key.starts_with("sk-ant-") && key.len() > 20
    }

    /// Mask an API key for display (show first 8 and last 4 chars)
    pub fn mask_key(key: &str) -> String {
        if key.len() <= 12 || !key.is_ascii() {
            return "*".repeat(key.chars().count());
        }
        let prefix = &key[..8];
        let suffix = &key[key.len() - 4..];
        format!("{}...{}", prefix, suffix)
    }
}
