//! XRPC response shapes (only the fields Skyspace shows)

use serde::Deserialize;

/// `app.bsky.actor.getProfile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub did: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub follows_count: u64,
    #[serde(default)]
    pub posts_count: u64,
}

impl Profile {
    /// Display name, falling back to the handle
    pub fn name(&self) -> &str {
        self.display_name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or(&self.handle)
    }
}

/// One entry of `app.bsky.graph.getFollowers`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follower {
    pub did: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Follower {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or(&self.handle)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FollowersResponse {
    #[serde(default)]
    pub followers: Vec<Follower>,
}

/// One entry of `app.bsky.feed.getAuthorFeed`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedItem {
    pub post: Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub uri: String,
    #[serde(default)]
    pub record: PostRecord,
    #[serde(default)]
    pub indexed_at: Option<String>,
    #[serde(default)]
    pub like_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Post {
    /// `YYYY-MM-DD HH:MM` from the record timestamp, if present
    pub fn timestamp(&self) -> Option<String> {
        let raw = self.record.created_at.as_deref().or(self.indexed_at.as_deref())?;
        let date = raw.get(..10)?;
        let time = raw.get(11..16)?;
        Some(format!("{} {}", date, time))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedResponse {
    #[serde(default)]
    pub feed: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveHandleResponse {
    pub did: String,
}

/// `com.atproto.server.createSession`, minus the tokens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionInfo {
    pub did: String,
    pub handle: String,
}

/// XRPC error body
#[derive(Debug, Default, Deserialize)]
pub(crate) struct XrpcError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_tolerates_missing_counts() {
        let profile: Profile = serde_json::from_value(json!({
            "did": "did:plc:alice",
            "handle": "alice.bsky.social",
            "displayName": ""
        }))
        .unwrap();
        assert_eq!(profile.followers_count, 0);
        assert_eq!(profile.name(), "alice.bsky.social");
    }

    #[test]
    fn post_timestamp_is_trimmed() {
        let item: FeedItem = serde_json::from_value(json!({
            "post": {
                "uri": "at://did:plc:alice/app.bsky.feed.post/1",
                "record": { "text": "hello", "createdAt": "2024-05-01T12:34:56.789Z" },
                "likeCount": 3
            }
        }))
        .unwrap();
        assert_eq!(item.post.timestamp().as_deref(), Some("2024-05-01 12:34"));
        assert_eq!(item.post.record.text, "hello");
    }
}
