//! Login session persistence
//!
//! Remembers who is signed in and which profile was open last, so the TUI
//! and CLI one-shots act as the same identity.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Config;
use crate::identity::{Did, IdentityProvider};

/// The signed-in Bluesky account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedIn {
    pub did: Did,
    pub handle: String,
}

/// All session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Current identity, if logged in
    #[serde(default)]
    pub identity: Option<SignedIn>,
    /// DID or handle of the profile last viewed
    #[serde(default)]
    pub last_profile: Option<String>,
}

impl Session {
    /// Load session from disk
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::session_path()?)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::session_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read session from {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse session.json")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize session")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write session to {:?}", path))?;

        Ok(())
    }

    /// Get the path to the session file
    pub fn session_path() -> Result<PathBuf> {
        Ok(Config::data_dir()?.join("session.json"))
    }

    pub fn sign_in(&mut self, did: Did, handle: impl Into<String>) {
        self.identity = Some(SignedIn { did, handle: handle.into() });
    }

    pub fn sign_out(&mut self) {
        self.identity = None;
    }

    /// Signed-in DID, if any
    pub fn did(&self) -> Option<&Did> {
        self.identity.as_ref().map(|i| &i.did)
    }

    pub fn handle(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.handle.as_str())
    }
}

impl IdentityProvider for Session {
    fn current_identity(&self) -> Option<Did> {
        self.did().cloned()
    }
}
