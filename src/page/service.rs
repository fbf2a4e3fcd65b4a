//! Ownership checks and the swap-on-change history rule

use tracing::{debug, info};

use super::error::PageError;
use super::model::{Page, PageFields, ThemeUpdate};
use super::store::PageStore;
use crate::identity::{Did, IdentityProvider};
use crate::theme::ThemeConfig;

/// Work out the stored fields for `update` applied to `existing`
///
/// A new current theme that differs from the stored one pushes the stored
/// one into history. An explicit previous theme always wins over that.
/// Submitting an equal theme leaves history untouched.
pub fn plan_update(existing: &Page, update: ThemeUpdate) -> Result<PageFields, PageError> {
    let ThemeUpdate { current_theme, previous_theme } = update;

    match (current_theme, previous_theme) {
        (None, None) => Err(PageError::Validation("No valid fields provided".to_string())),
        (Some(current), Some(previous)) => {
            Ok(PageFields { current_theme: current, previous_theme: Some(previous) })
        }
        (Some(current), None) => {
            let previous_theme = if current != existing.current_theme {
                Some(existing.current_theme.clone())
            } else {
                existing.previous_theme.clone()
            };
            Ok(PageFields { current_theme: current, previous_theme })
        }
        (None, Some(previous)) => Ok(PageFields {
            current_theme: existing.current_theme.clone(),
            previous_theme: Some(previous),
        }),
    }
}

/// Page operations on top of a [`PageStore`]
///
/// Each mutation is one read-modify-write with no version check.
pub struct PageService<S> {
    store: S,
}

impl<S: PageStore> PageService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read a page; no identity needed
    pub fn get_page(&self, did: &Did) -> Result<Option<Page>, PageError> {
        Ok(self.store.get_page(did)?)
    }

    /// The caller's page, created with the default theme on first use
    pub fn ensure_page(
        &mut self,
        caller: &dyn IdentityProvider,
        did: &Did,
    ) -> Result<Page, PageError> {
        authorize(caller, did)?;

        if let Some(page) = self.store.get_page(did)? {
            return Ok(page);
        }

        let page = Page::new(did.clone(), ThemeConfig::default());
        self.store.create_page(&page)?;
        info!(%did, page_id = %page.page_id, "Created page");
        Ok(page)
    }

    /// Apply a theme change to the page owned by `did`
    pub fn update_page_theme(
        &mut self,
        caller: &dyn IdentityProvider,
        did: &Did,
        page_id: &str,
        update: ThemeUpdate,
    ) -> Result<Page, PageError> {
        authorize(caller, did)?;

        let existing = self.load(did)?;
        if existing.page_id != page_id {
            return Err(PageError::NotFound(page_id.to_string()));
        }

        let fields = plan_update(&existing, update)?;
        let shifted = fields.previous_theme != existing.previous_theme;
        self.store.put_page(&existing.page_id, &fields)?;
        info!(%did, page_id, history_changed = shifted, "Saved page theme");

        self.load(did)
    }

    /// Swap current and previous themes
    pub fn revert_theme(
        &mut self,
        caller: &dyn IdentityProvider,
        did: &Did,
    ) -> Result<Page, PageError> {
        authorize(caller, did)?;

        let existing = self.load(did)?;
        let Some(previous) = existing.previous_theme.clone() else {
            return Err(PageError::NoPreviousTheme);
        };

        let update = ThemeUpdate::current(previous).with_previous(existing.current_theme.clone());
        let page = self.update_page_theme(caller, did, &existing.page_id, update)?;
        info!(%did, "Reverted page theme");
        Ok(page)
    }

    fn load(&self, did: &Did) -> Result<Page, PageError> {
        debug!(%did, "Loading page");
        self.store.get_page(did)?.ok_or_else(|| PageError::NotFound(did.to_string()))
    }
}

/// The caller must be signed in as the page owner
fn authorize(caller: &dyn IdentityProvider, did: &Did) -> Result<(), PageError> {
    match caller.current_identity() {
        Some(identity) if &identity == did => Ok(()),
        _ => Err(PageError::Unauthorized),
    }
}
