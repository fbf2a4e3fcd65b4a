//! Profile pages and their two-slot theme history
//!
//! A [`Page`] carries the current theme and, once it has been changed, the
//! theme before it. [`PageService`] is the only writer: it checks ownership
//! and applies the swap-on-change rule before anything reaches a
//! [`PageStore`].

mod error;
mod model;
mod service;
mod store;

pub use error::{PageError, StoreError};
pub use model::{Page, PageFields, ThemeUpdate};
pub use service::{PageService, plan_update};
pub use store::{JsonPageStore, MemoryPageStore, PageStore};
