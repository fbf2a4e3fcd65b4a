//! HTTP client for Bluesky XRPC endpoints

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::error::BlueskyError;
use super::models::{
    FeedItem, FeedResponse, Follower, FollowersResponse, Profile, ResolveHandleResponse,
    SessionInfo, XrpcError,
};
use crate::identity::Did;

/// Bluesky AppView + PDS client
#[derive(Debug, Clone)]
pub struct BlueskyClient {
    client: Client,
    appview_url: String,
    pds_url: String,
}

impl BlueskyClient {
    /// Largest `limit` the list endpoints accept
    const MAX_LIMIT: u32 = 100;

    pub fn new(appview_url: &str, pds_url: &str, timeout: Duration) -> Result<Self, BlueskyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            appview_url: appview_url.trim_end_matches('/').to_string(),
            pds_url: pds_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a handle (`alice.bsky.social`, `@alice.bsky.social`) to its DID
    pub async fn resolve_handle(&self, handle: &str) -> Result<Did, BlueskyError> {
        let handle = handle.trim().trim_start_matches('@');
        let response: ResolveHandleResponse = self
            .get("com.atproto.identity.resolveHandle", &[("handle", handle.to_string())])
            .await?;
        Ok(Did::parse(&response.did)?)
    }

    /// Accept either a DID or a handle
    pub async fn resolve_actor(&self, actor: &str) -> Result<Did, BlueskyError> {
        match Did::parse(actor) {
            Ok(did) => Ok(did),
            Err(_) => self.resolve_handle(actor).await,
        }
    }

    pub async fn get_profile(&self, actor: &str) -> Result<Profile, BlueskyError> {
        self.get("app.bsky.actor.getProfile", &[("actor", actor.to_string())]).await
    }

    /// The first `limit` followers, shown as the friends list
    pub async fn get_followers(
        &self,
        actor: &str,
        limit: u32,
    ) -> Result<Vec<Follower>, BlueskyError> {
        let response: FollowersResponse = self
            .get(
                "app.bsky.graph.getFollowers",
                &[("actor", actor.to_string()), ("limit", clamp_limit(limit).to_string())],
            )
            .await?;
        Ok(response.followers)
    }

    /// Recent posts by `actor`
    pub async fn get_author_feed(
        &self,
        actor: &str,
        limit: u32,
    ) -> Result<Vec<FeedItem>, BlueskyError> {
        let response: FeedResponse = self
            .get(
                "app.bsky.feed.getAuthorFeed",
                &[("actor", actor.to_string()), ("limit", clamp_limit(limit).to_string())],
            )
            .await?;
        Ok(response.feed)
    }

    /// Log in with a handle and app password against the PDS
    pub async fn create_session(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<SessionInfo, BlueskyError> {
        let url = format!("{}/xrpc/com.atproto.server.createSession", self.pds_url);
        let identifier = identifier.trim().trim_start_matches('@');
        let response = self
            .client
            .post(&url)
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(BlueskyError::InvalidCredentials);
        }
        decode(response, identifier).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T, BlueskyError> {
        let url = format!("{}/xrpc/{}", self.appview_url, method);
        debug!(method, "Bluesky request");
        let response = self.client.get(&url).query(query).send().await?;
        let subject = query.first().map(|(_, v)| v.as_str()).unwrap_or(method);
        decode(response, subject).await
    }
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, BlueskyClient::MAX_LIMIT)
}

/// Map an XRPC response to a value or a typed error
async fn decode<T: DeserializeOwned>(response: Response, subject: &str) -> Result<T, BlueskyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body: XrpcError = response.json().await.unwrap_or_default();
    let error = body.error.unwrap_or_default();
    let message = body.message.unwrap_or_else(|| error.clone());

    if status == StatusCode::NOT_FOUND
        || (status == StatusCode::BAD_REQUEST
            && (error.contains("NotFound") || message.to_lowercase().contains("not found")))
    {
        return Err(BlueskyError::NotFound(subject.to_string()));
    }
    Err(BlueskyError::Api { status: status.as_u16(), message })
}
