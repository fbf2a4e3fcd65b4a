//! Skyspace - MySpace-style profile themes for Bluesky
//!
//! Skyspace gives every Bluesky identity a themeable profile page. Themes can
//! be edited field by field, imported as JSON, or generated from a plain
//! description by Claude (with an offline keyword generator as fallback), and
//! every save keeps the previous theme around for a one-step revert.

pub mod app;
pub mod bluesky;
pub mod claude;
pub mod config;
pub mod generator;
pub mod identity;
pub mod page;
pub mod studio;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use studio::Studio;
