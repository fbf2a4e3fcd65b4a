//! Bluesky (AT Protocol) collaborator
//!
//! Read-only profile data comes from the public AppView; login goes through
//! the PDS session endpoint. No tokens are kept after login.

pub mod client;
pub mod error;
pub mod models;

pub use client::BlueskyClient;
pub use error::BlueskyError;
pub use models::{FeedItem, Follower, Post, Profile, SessionInfo};
