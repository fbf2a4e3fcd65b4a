//! Application facade shared by the TUI and the CLI
//!
//! A [`Studio`] owns the login session, the page service and the network
//! clients. Every theme mutation goes through it with the session as the
//! caller identity.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::bluesky::{BlueskyClient, FeedItem, Follower, Profile};
use crate::claude::{ApiKeyManager, ClaudeClient, ClaudeModel};
use crate::config::Config;
use crate::config::session::Session;
use crate::generator::{GeneratedTheme, generate_with_ai};
use crate::identity::Did;
use crate::page::{JsonPageStore, Page, PageError, PageService, PageStore, ThemeUpdate};
use crate::theme::{PartialThemeConfig, ThemeConfig, merge};

/// Timeout for Bluesky requests
const BLUESKY_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything shown on a profile screen
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub did: Did,
    /// The stored page, if this account has one
    pub page: Option<Page>,
    pub profile: Option<Profile>,
    pub friends: Vec<Follower>,
    pub feed: Vec<FeedItem>,
    /// Profile data that failed to load, shown inline
    pub load_error: Option<String>,
    /// True when the page belongs to the signed-in user
    pub editable: bool,
}

impl ProfileView {
    /// Theme to render: the page's current theme or the defaults
    pub fn theme(&self) -> ThemeConfig {
        self.page.as_ref().map(|p| p.current_theme.clone()).unwrap_or_default()
    }

    /// Handle if the profile loaded, else the DID
    pub fn title(&self) -> String {
        match &self.profile {
            Some(profile) => format!("@{}", profile.handle),
            None => self.did.to_string(),
        }
    }
}

/// Where config and session are written back, when they are
struct StatePaths {
    config: PathBuf,
    session: PathBuf,
}

pub struct Studio<S = JsonPageStore> {
    config: Config,
    session: Session,
    pages: PageService<S>,
    bluesky: BlueskyClient,
    claude: Option<ClaudeClient>,
    paths: Option<StatePaths>,
}

impl Studio<JsonPageStore> {
    /// Load config, session and pages from the data directory
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let session = Session::load()?;
        let store = JsonPageStore::open(Config::pages_path()?);
        let bluesky = BlueskyClient::new(&config.appview_url, &config.pds_url, BLUESKY_TIMEOUT)
            .context("Failed to build Bluesky client")?;
        let claude = claude_from_keyring(&config);

        Ok(Self::new(config, session, store, bluesky, claude)
            .with_paths(Config::config_path()?, Session::session_path()?))
    }
}

fn claude_from_keyring(config: &Config) -> Option<ClaudeClient> {
    let key = match ApiKeyManager::resolve_api_key() {
        Ok(key) => key,
        Err(e) => {
            debug!("Claude unavailable: {}", e);
            return None;
        }
    };

    match ClaudeClient::new(key, config.claude_model, config.ai_timeout()) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Failed to build Claude client: {}", e);
            None
        }
    }
}

impl<S: PageStore> Studio<S> {
    pub fn new(
        config: Config,
        session: Session,
        store: S,
        bluesky: BlueskyClient,
        claude: Option<ClaudeClient>,
    ) -> Self {
        Self { config, session, pages: PageService::new(store), bluesky, claude, paths: None }
    }

    /// Write config and session changes back to these files
    pub fn with_paths(mut self, config: PathBuf, session: PathBuf) -> Self {
        self.paths = Some(StatePaths { config, session });
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pages(&self) -> &PageService<S> {
        &self.pages
    }

    /// Whether `did` is the signed-in account
    pub fn is_own(&self, did: &Did) -> bool {
        self.session.did() == Some(did)
    }

    /// Short description of the generation backend
    pub fn ai_status(&self) -> String {
        match (&self.claude, self.config.ai_enabled) {
            (_, false) => "AI off (keyword matching)".to_string(),
            (None, true) => "No API key (keyword matching)".to_string(),
            (Some(client), true) => client.model().display_name().to_string(),
        }
    }

    /// Log in against the PDS and make sure the account has a page
    pub async fn login(&mut self, handle: &str, password: &str) -> Result<Page> {
        let info = self
            .bluesky
            .create_session(handle, password)
            .await
            .with_context(|| format!("Login failed for {}", handle))?;
        let did = Did::parse(&info.did)?;

        self.session.sign_in(did.clone(), info.handle.clone());
        self.persist_session()?;
        info!(%did, handle = %info.handle, "Logged in");

        Ok(self.pages.ensure_page(&self.session, &did)?)
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Some(handle) = self.session.handle() {
            info!(handle, "Logged out");
        }
        self.session.sign_out();
        self.persist_session()
    }

    /// The signed-in user's page, created on first use
    pub fn own_page(&mut self) -> Result<Page, PageError> {
        let did = self.session.did().cloned().ok_or(PageError::Unauthorized)?;
        self.pages.ensure_page(&self.session, &did)
    }

    /// Resolve `actor` and gather its page and profile data
    ///
    /// Only resolving the actor can fail. Profile, friends and feed errors
    /// land in [`ProfileView::load_error`].
    pub async fn load_profile(&mut self, actor: &str) -> Result<ProfileView> {
        let actor = actor.trim();
        let did = self
            .bluesky
            .resolve_actor(actor)
            .await
            .with_context(|| format!("Could not find {}", actor))?;

        let editable = self.is_own(&did);
        let page = if editable { Some(self.own_page()?) } else { self.pages.get_page(&did)? };

        let id = did.as_str();
        let (profile, friends, feed) = tokio::join!(
            self.bluesky.get_profile(id),
            self.bluesky.get_followers(id, self.config.followers_limit),
            self.bluesky.get_author_feed(id, self.config.feed_limit),
        );

        let mut errors = Vec::new();
        let profile = profile.map_err(|e| errors.push(format!("profile: {}", e))).ok();
        let friends = friends.map_err(|e| errors.push(format!("friends: {}", e))).ok();
        let feed = feed.map_err(|e| errors.push(format!("posts: {}", e))).ok();

        let load_error = if errors.is_empty() {
            None
        } else {
            warn!(%did, "Profile data incomplete: {}", errors.join("; "));
            Some(errors.join("; "))
        };

        let view = ProfileView {
            did: did.clone(),
            page,
            profile,
            friends: friends.unwrap_or_default(),
            feed: feed.unwrap_or_default(),
            load_error,
            editable,
        };

        self.session.last_profile = Some(did.to_string());
        if let Err(e) = self.persist_session() {
            warn!("Failed to remember last profile: {:#}", e);
        }
        Ok(view)
    }

    /// Current theme of the signed-in user's page, if any
    pub fn current_theme(&self) -> Result<Option<ThemeConfig>, PageError> {
        let Some(did) = self.session.did() else {
            return Ok(None);
        };
        Ok(self.pages.get_page(did)?.map(|page| page.current_theme))
    }

    /// Persist `theme` as the current theme; history follows automatically
    pub fn save_theme(&mut self, theme: ThemeConfig) -> Result<Page, PageError> {
        self.update_own(ThemeUpdate::current(theme))
    }

    /// Overwrite only the history slot
    pub fn set_previous_theme(&mut self, theme: ThemeConfig) -> Result<Page, PageError> {
        self.update_own(ThemeUpdate::previous_only(theme))
    }

    /// Merge theme JSON over the current theme and save it
    pub fn apply_theme_json(&mut self, text: &str) -> Result<Page, PageError> {
        let page = self.own_page()?;
        let theme = parse_theme_json(text, &page.current_theme)?;
        self.save_theme(theme)
    }

    pub fn revert(&mut self) -> Result<Page, PageError> {
        let did = self.session.did().cloned().ok_or(PageError::Unauthorized)?;
        self.pages.revert_theme(&self.session, &did)
    }

    fn update_own(&mut self, update: ThemeUpdate) -> Result<Page, PageError> {
        let page = self.own_page()?;
        self.pages.update_page_theme(&self.session, &page.did, &page.page_id, update)
    }

    /// Generation client, or `None` when offline or AI is switched off
    pub fn generator(&self, offline: bool) -> Option<ClaudeClient> {
        if offline || !self.config.ai_enabled {
            return None;
        }
        self.claude.clone()
    }

    pub async fn generate(
        &self,
        prompt: &str,
        current: Option<&ThemeConfig>,
        offline: bool,
    ) -> GeneratedTheme {
        let service = self.generator(offline);
        generate_with_ai(prompt, current, service.as_ref()).await
    }

    /// Store a Claude key in the keyring and start using it
    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        let key = key.trim();
        ApiKeyManager::set_api_key(key)
            .inspect_err(|e| error!("Failed to store API key: {}", e))
            .context("Failed to store API key")?;

        let client =
            ClaudeClient::new(key.to_string(), self.config.claude_model, self.config.ai_timeout())?;
        self.claude = Some(client);
        info!("Stored Claude API key {}", ApiKeyManager::mask_key(key));
        Ok(())
    }

    /// Send a minimal request with the configured key
    pub async fn check_api_key(&self) -> Result<()> {
        let client = self.claude.as_ref().context("No Claude API key configured")?;
        client.test_connection().await.context("Claude rejected the API key")?;
        info!("Claude API key verified");
        Ok(())
    }

    pub fn set_model(&mut self, model: ClaudeModel) -> Result<()> {
        self.config.claude_model = model;
        if let Some(client) = self.claude.as_mut() {
            client.set_model(model);
        }
        self.persist_config()
    }

    pub fn set_ai_enabled(&mut self, enabled: bool) -> Result<()> {
        self.config.ai_enabled = enabled;
        self.persist_config()
    }

    fn persist_config(&self) -> Result<()> {
        match &self.paths {
            Some(paths) => self.config.save_to(&paths.config),
            None => Ok(()),
        }
    }

    fn persist_session(&self) -> Result<()> {
        match &self.paths {
            Some(paths) => self.session.save_to(&paths.session),
            None => Ok(()),
        }
    }
}

/// Parse hand-edited theme JSON and merge it over `base`
///
/// Malformed JSON, or JSON that is not an object, is a validation error.
/// Unknown or out-of-domain fields are ignored.
pub fn parse_theme_json(text: &str, base: &ThemeConfig) -> Result<ThemeConfig, PageError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PageError::Validation(format!("Invalid theme JSON: {}", e)))?;

    if !value.is_object() {
        return Err(PageError::Validation("Theme JSON must be an object".to_string()));
    }

    Ok(merge(base, &PartialThemeConfig::from_value(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationSource;
    use crate::page::MemoryPageStore;
    use crate::theme::{FriendsListPosition, ProfilePosition};
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn alice() -> Did {
        Did::parse("did:plc:alice").unwrap()
    }

    fn studio(server: &MockServer, session: Session) -> Studio<MemoryPageStore> {
        let bluesky =
            BlueskyClient::new(&server.base_url(), &server.base_url(), Duration::from_secs(5))
                .unwrap();
        Studio::new(Config::default(), session, MemoryPageStore::new(), bluesky, None)
    }

    fn signed_in() -> Session {
        let mut session = Session::default();
        session.sign_in(alice(), "alice.test");
        session
    }

    fn ocean() -> ThemeConfig {
        let mut theme = ThemeConfig::default();
        theme.colors.primary = "#0891b2".into();
        theme
    }

    #[tokio::test]
    async fn login_records_identity_and_creates_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path("/xrpc/com.atproto.server.createSession");
            then.status(200).json_body(json!({
                "did": "did:plc:alice",
                "handle": "alice.test",
                "accessJwt": "secret"
            }));
        });

        let dir = TempDir::new().unwrap();
        let session_path = dir.path().join("session.json");
        let mut studio = studio(&server, Session::default())
            .with_paths(dir.path().join("config.json"), session_path.clone());

        let page = studio.login("alice.test", "app-password").await.unwrap();
        mock.assert();
        assert_eq!(page.did, alice());
        assert_eq!(page.current_theme, ThemeConfig::default());
        assert_eq!(studio.session().did(), Some(&alice()));

        let saved = std::fs::read_to_string(&session_path).unwrap();
        assert!(saved.contains("did:plc:alice"));
        assert!(!saved.contains("secret"));
    }

    #[tokio::test]
    async fn rejected_login_keeps_session_anonymous() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/xrpc/com.atproto.server.createSession");
            then.status(401).json_body(json!({ "error": "AuthenticationRequired" }));
        });

        let mut studio = studio(&server, Session::default());
        assert!(studio.login("alice.test", "wrong").await.is_err());
        assert_eq!(studio.session().did(), None);
    }

    #[test]
    fn save_and_revert_through_the_session() {
        let server = MockServer::start();
        let mut studio = studio(&server, signed_in());

        let saved = studio.save_theme(ocean()).unwrap();
        assert_eq!(saved.current_theme, ocean());
        assert_eq!(saved.previous_theme, Some(ThemeConfig::default()));

        let reverted = studio.revert().unwrap();
        assert_eq!(reverted.current_theme, ThemeConfig::default());
        assert_eq!(reverted.previous_theme, Some(ocean()));
    }

    #[test]
    fn anonymous_writes_are_unauthorized() {
        let server = MockServer::start();
        let mut studio = studio(&server, Session::default());

        assert!(matches!(studio.save_theme(ocean()), Err(PageError::Unauthorized)));
        assert!(matches!(studio.revert(), Err(PageError::Unauthorized)));
        assert_eq!(studio.pages().store().writes(), 0);
    }

    #[test]
    fn set_previous_only_touches_history() {
        let server = MockServer::start();
        let mut studio = studio(&server, signed_in());

        let page = studio.set_previous_theme(ocean()).unwrap();
        assert_eq!(page.current_theme, ThemeConfig::default());
        assert_eq!(page.previous_theme, Some(ocean()));
    }

    #[test]
    fn apply_json_merges_over_current() {
        let server = MockServer::start();
        let mut studio = studio(&server, signed_in());
        studio.save_theme(ocean()).unwrap();

        let page = studio.apply_theme_json(r#"{"layout": {"friendsList": "hidden"}}"#).unwrap();
        assert_eq!(page.current_theme.colors.primary, "#0891b2");
        assert_eq!(page.current_theme.layout.friends_list, FriendsListPosition::Hidden);
        assert_eq!(page.previous_theme, Some(ocean()));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let base = ThemeConfig::default();
        assert!(matches!(parse_theme_json("{ nope", &base), Err(PageError::Validation(_))));
        assert!(matches!(parse_theme_json("\"dark\"", &base), Err(PageError::Validation(_))));

        let theme = parse_theme_json(r#"{"layout": {"profilePosition": "center"}}"#, &base);
        assert_eq!(theme.unwrap().layout.profile_position, ProfilePosition::Center);
    }

    #[tokio::test]
    async fn profile_fetch_errors_are_inline() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/xrpc/app.bsky.actor.getProfile");
            then.status(500).json_body(json!({ "error": "InternalServerError" }));
        });
        server.mock(|when, then| {
            when.method(Method::GET).path("/xrpc/app.bsky.graph.getFollowers");
            then.status(200).json_body(json!({
                "followers": [{ "did": "did:plc:bob", "handle": "bob.test" }]
            }));
        });
        server.mock(|when, then| {
            when.method(Method::GET).path("/xrpc/app.bsky.feed.getAuthorFeed");
            then.status(200).json_body(json!({ "feed": [] }));
        });

        let mut studio = studio(&server, signed_in());
        let view = studio.load_profile("did:plc:alice").await.unwrap();

        assert!(view.editable);
        assert!(view.page.is_some());
        assert!(view.profile.is_none());
        assert_eq!(view.friends.len(), 1);
        assert!(view.load_error.unwrap().starts_with("profile:"));
        assert_eq!(studio.session().last_profile.as_deref(), Some("did:plc:alice"));
    }

    #[tokio::test]
    async fn other_profiles_are_read_only() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/xrpc/app.bsky.actor.getProfile");
            then.status(200).json_body(json!({ "did": "did:plc:bob", "handle": "bob.test" }));
        });
        server.mock(|when, then| {
            when.method(Method::GET).path("/xrpc/app.bsky.graph.getFollowers");
            then.status(200).json_body(json!({ "followers": [] }));
        });
        server.mock(|when, then| {
            when.method(Method::GET).path("/xrpc/app.bsky.feed.getAuthorFeed");
            then.status(200).json_body(json!({ "feed": [] }));
        });

        let mut studio = studio(&server, signed_in());
        let view = studio.load_profile("did:plc:bob").await.unwrap();

        assert!(!view.editable);
        assert!(view.page.is_none());
        assert_eq!(view.theme(), ThemeConfig::default());
        assert_eq!(view.title(), "@bob.test");
        assert_eq!(studio.pages().store().writes(), 0);
    }

    #[tokio::test]
    async fn generation_without_client_uses_keywords() {
        let server = MockServer::start();
        let studio = studio(&server, signed_in());
        assert_eq!(studio.ai_status(), "No API key (keyword matching)");

        let generated = studio.generate("forest", None, false).await;
        assert_eq!(generated.source, GenerationSource::Keywords);
        assert_eq!(generated.theme.colors.primary, "#059669");
    }

    #[test]
    fn settings_persist_to_config_file() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        let mut studio = studio(&server, Session::default())
            .with_paths(config_path.clone(), dir.path().join("session.json"));

        studio.set_ai_enabled(false).unwrap();
        studio.set_model(ClaudeModel::Sonnet45).unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert!(!config.ai_enabled);
        assert_eq!(config.claude_model, ClaudeModel::Sonnet45);
        assert_eq!(studio.ai_status(), "AI off (keyword matching)");
        assert!(studio.generator(false).is_none());
    }
}
