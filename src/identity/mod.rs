//! Decentralized identifiers and the "who is asking" seam
//!
//! Every write to a page is checked against the caller's [`Did`]. Identity
//! comes from an [`IdentityProvider`], which in the application is the
//! persisted login session.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Input is not of the form `did:<method>:<id>`
    #[error("Invalid DID: {0}")]
    InvalidDid(String),
}

/// A normalized decentralized identifier (`did:plc:...`, `did:web:...`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Parse and normalize a DID
    ///
    /// Identifiers arrive URL-encoded from links (`did%3Aplc%3A...`), padded
    /// from copy/paste, or in mixed case, so the stored form is decoded,
    /// trimmed, and lower-cased before validation.
    pub fn parse(input: &str) -> Result<Self, IdentityError> {
        let normalized = normalize(input);

        let mut parts = normalized.splitn(3, ':');
        let scheme = parts.next().unwrap_or_default();
        let method = parts.next().unwrap_or_default();
        let id = parts.next().unwrap_or_default();

        let method_ok = !method.is_empty()
            && method.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if scheme != "did" || !method_ok || id.is_empty() || id.contains(char::is_whitespace) {
            return Err(IdentityError::InvalidDid(input.trim().to_string()));
        }

        Ok(Self(normalized))
    }

    /// The DID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// DID method (`plc`, `web`, ...)
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// Check whether a raw, possibly un-normalized string names this DID
    pub fn matches(&self, raw: &str) -> bool {
        normalize(raw) == self.0
    }
}

fn normalize(input: &str) -> String {
    let decoded = urlencoding::decode(input)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| input.to_string());
    decoded.trim().to_lowercase()
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Did {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl std::str::FromStr for Did {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Source of the identity the current request runs as
pub trait IdentityProvider {
    /// The authenticated identity, or `None` when nobody is signed in
    fn current_identity(&self) -> Option<Did>;
}

/// Fixed identity, for CLI one-shots and tests
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<Did>);

impl StaticIdentity {
    /// Identity signed in as `did`
    pub fn signed_in(did: Did) -> Self {
        Self(Some(did))
    }

    /// Nobody signed in
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<Did> {
        self.0.clone()
    }
}
