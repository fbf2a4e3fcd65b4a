//! Error types for page persistence

use std::path::PathBuf;

use thiserror::Error;

use crate::identity::Did;

/// Failures of the storage backend itself
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access page store {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Page store {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No stored page with id {0}")]
    UnknownPage(String),

    #[error("A page already exists for {0}")]
    AlreadyExists(Did),
}

/// Errors surfaced by page operations
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Not allowed to modify this page")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("No previous theme to revert to")]
    NoPreviousTheme,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl PageError {
    /// Check if retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, PageError::Storage(_))
    }
}
