//! Page persistence backends

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::StoreError;
use super::model::{Page, PageFields};
use crate::identity::Did;

/// Persistence contract for pages
///
/// Stores know nothing about authorization or history; they read and write
/// exactly what [`PageService`](super::PageService) hands them.
pub trait PageStore {
    /// The page owned by `did`, if any
    fn get_page(&self, did: &Did) -> Result<Option<Page>, StoreError>;

    /// Overwrite the theme fields of an existing page
    fn put_page(&mut self, page_id: &str, fields: &PageFields) -> Result<(), StoreError>;

    /// Insert a page for an identity that has none
    fn create_page(&mut self, page: &Page) -> Result<(), StoreError>;
}

/// On-disk layout of `pages.json`
#[derive(Debug, Default, Serialize, Deserialize)]
struct PageFile {
    pages: Vec<Page>,
}

impl PageFile {
    fn find(&self, did: &Did) -> Option<&Page> {
        self.pages.iter().find(|p| &p.did == did)
    }

    fn put(&mut self, page_id: &str, fields: &PageFields) -> Result<(), StoreError> {
        let page = self
            .pages
            .iter_mut()
            .find(|p| p.page_id == page_id)
            .ok_or_else(|| StoreError::UnknownPage(page_id.to_string()))?;
        page.current_theme = fields.current_theme.clone();
        page.previous_theme = fields.previous_theme.clone();
        Ok(())
    }

    fn insert(&mut self, page: &Page) -> Result<(), StoreError> {
        if self.find(&page.did).is_some() {
            return Err(StoreError::AlreadyExists(page.did.clone()));
        }
        self.pages.push(page.clone());
        Ok(())
    }
}

/// All page records in a single JSON file
///
/// Every operation reads the file fresh, so separate processes (the TUI and
/// a CLI one-shot) see each other's writes. Last write wins.
#[derive(Debug, Clone)]
pub struct JsonPageStore {
    path: PathBuf,
}

impl JsonPageStore {
    /// Use the store at `path`; the file is created on first write
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<PageFile, StoreError> {
        if !self.path.exists() {
            return Ok(PageFile::default());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        serde_json::from_str(&contents)
            .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })
    }

    fn write(&self, file: &PageFile) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = serde_json::to_string_pretty(file)
            .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })?;

        // Readers only ever see the old file or the complete new one
        let staging = self.staging_path();
        fs::write(&staging, contents).map_err(io_err)?;
        fs::rename(&staging, &self.path).map_err(io_err)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PageStore for JsonPageStore {
    fn get_page(&self, did: &Did) -> Result<Option<Page>, StoreError> {
        let file = self.read()?;
        debug!(%did, pages = file.pages.len(), "Read page store");
        Ok(file.find(did).cloned())
    }

    fn put_page(&mut self, page_id: &str, fields: &PageFields) -> Result<(), StoreError> {
        let mut file = self.read()?;
        file.put(page_id, fields)?;
        self.write(&file)
    }

    fn create_page(&mut self, page: &Page) -> Result<(), StoreError> {
        let mut file = self.read()?;
        file.insert(page)?;
        self.write(&file)
    }
}

/// Pages held in memory, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    file: PageFile,
    writes: usize,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `pages`
    pub fn with_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        Self { file: PageFile { pages: pages.into_iter().collect() }, writes: 0 }
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PageStore for MemoryPageStore {
    fn get_page(&self, did: &Did) -> Result<Option<Page>, StoreError> {
        Ok(self.file.find(did).cloned())
    }

    fn put_page(&mut self, page_id: &str, fields: &PageFields) -> Result<(), StoreError> {
        self.file.put(page_id, fields)?;
        self.writes += 1;
        Ok(())
    }

    fn create_page(&mut self, page: &Page) -> Result<(), StoreError> {
        self.file.insert(page)?;
        self.writes += 1;
        Ok(())
    }
}
