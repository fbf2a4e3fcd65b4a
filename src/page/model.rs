//! Page records and update requests

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::Did;
use crate::theme::{ThemeConfig, deserialize_lenient, deserialize_lenient_opt};

/// A user's profile page record
///
/// Stored themes are read through the repair path, so a record written by an
/// older version (or edited by hand) still loads as complete themes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page_id: String,
    pub did: Did,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub current_theme: ThemeConfig,
    #[serde(default, deserialize_with = "deserialize_lenient_opt")]
    pub previous_theme: Option<ThemeConfig>,
}

impl Page {
    /// A fresh page with no history
    pub fn new(did: Did, theme: ThemeConfig) -> Self {
        Self {
            page_id: Uuid::new_v4().to_string(),
            did,
            current_theme: theme,
            previous_theme: None,
        }
    }

    pub fn has_previous_theme(&self) -> bool {
        self.previous_theme.is_some()
    }

    /// Stored theme fields of this page
    pub fn fields(&self) -> PageFields {
        PageFields {
            current_theme: self.current_theme.clone(),
            previous_theme: self.previous_theme.clone(),
        }
    }
}

/// A requested theme change
///
/// Either field may be absent. An explicit `previous_theme` replaces the
/// history slot outright instead of letting the update compute it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeUpdate {
    pub current_theme: Option<ThemeConfig>,
    pub previous_theme: Option<ThemeConfig>,
}

impl ThemeUpdate {
    /// Change the current theme, letting history follow automatically
    pub fn current(theme: ThemeConfig) -> Self {
        Self { current_theme: Some(theme), previous_theme: None }
    }

    /// Overwrite only the history slot
    pub fn previous_only(theme: ThemeConfig) -> Self {
        Self { current_theme: None, previous_theme: Some(theme) }
    }

    pub fn with_previous(mut self, theme: ThemeConfig) -> Self {
        self.previous_theme = Some(theme);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.current_theme.is_none() && self.previous_theme.is_none()
    }
}

/// The theme columns written by [`PageStore::put_page`](super::PageStore::put_page)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub current_theme: ThemeConfig,
    pub previous_theme: Option<ThemeConfig>,
}
