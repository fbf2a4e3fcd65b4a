//! Configuration management for Skyspace

pub mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::claude::ClaudeModel;

/// Overrides the data directory (and the config file location)
pub const DATA_DIR_ENV: &str = "SKYSPACE_DATA_DIR";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model used for AI theme generation
    pub claude_model: ClaudeModel,

    /// When false, themes are generated by keyword matching only
    pub ai_enabled: bool,

    /// HTTP timeout for the generation call, in seconds
    pub ai_timeout_secs: u64,

    /// Public Bluesky AppView used for profile data
    pub appview_url: String,

    /// PDS used to create login sessions
    pub pds_url: String,

    /// Friends shown on a profile
    pub followers_limit: u32,

    /// Posts shown on a profile
    pub feed_limit: u32,

    /// Vim mode enabled
    pub vim_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            claude_model: ClaudeModel::default(),
            ai_enabled: true,
            ai_timeout_secs: 30,
            appview_url: "https://public.api.bsky.app".to_string(),
            pds_url: "https://bsky.social".to_string(),
            followers_limit: 100,
            feed_limit: 10,
            vim_mode: true,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Load from an explicit path, writing the defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Some(dir) = Self::data_dir_override() {
            return Ok(dir.join("config.json"));
        }
        let proj_dirs =
            ProjectDirs::from("", "", "skyspace").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        if let Some(dir) = Self::data_dir_override() {
            return Ok(dir);
        }
        let proj_dirs =
            ProjectDirs::from("", "", "skyspace").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    fn data_dir_override() -> Option<PathBuf> {
        std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()).map(PathBuf::from)
    }

    /// Get the page store path
    pub fn pages_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("pages.json"))
    }

    /// Get the TUI log file path
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("skyspace.log"))
    }

    /// HTTP timeout for AI generation
    pub fn ai_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ai_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.claude_model, ClaudeModel::Haiku45);
        assert!(config.ai_enabled);
        assert_eq!(config.ai_timeout_secs, 30);
        assert_eq!(config.appview_url, "https://public.api.bsky.app");
        assert_eq!(config.followers_limit, 100);
        assert!(config.vim_mode);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let json = r#"{"ai_enabled":false,"claude_model":"Sonnet45"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.ai_enabled);
        assert_eq!(config.claude_model, ClaudeModel::Sonnet45);
        assert_eq!(config.feed_limit, 10);
        assert_eq!(config.pds_url, "https://bsky.social");
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let mut changed = config.clone();
        changed.vim_mode = false;
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), changed);
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn timeout_is_never_zero() {
        let config = Config { ai_timeout_secs: 0, ..Config::default() };
        assert_eq!(config.ai_timeout(), std::time::Duration::from_secs(1));
    }
}
