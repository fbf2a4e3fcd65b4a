//! HTTP client for Claude API

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::error::ClaudeError;
use super::models::{ClaudeModel, CreateMessageRequest, Message, MessageResponse};
use crate::generator::TextGenerator;

/// Claude API client
#[derive(Clone)]
pub struct ClaudeClient {
    /// HTTP client
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Messages endpoint
    api_url: String,
    /// Model used for generation
    model: ClaudeModel,
}

impl ClaudeClient {
    /// Claude API messages endpoint
    const API_URL: &'static str = "https://api.anthropic.com/v1/messages";
    /// API version header value
    const API_VERSION: &'static str = "2023-06-01";
    /// Token cap for a theme answer
    const THEME_MAX_TOKENS: u32 = 1024;

    /// Create a new Claude client with the given API key
    pub fn new(
        api_key: String,
        model: ClaudeModel,
        timeout: Duration,
    ) -> Result<Self, ClaudeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key, api_url: Self::API_URL.to_string(), model })
    }

    /// Point the client at another API root (`{base}/v1/messages`)
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.api_url = format!("{}/v1/messages", base.trim_end_matches('/'));
        self
    }

    pub fn model(&self) -> ClaudeModel {
        self.model
    }

    pub fn set_model(&mut self, model: ClaudeModel) {
        self.model = model;
    }

    /// Send a message request and return the complete response
    pub async fn send_message(
        &self,
        request: CreateMessageRequest,
    ) -> Result<MessageResponse, ClaudeError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClaudeError::RateLimited { retry_after_seconds: retry_after });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClaudeError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClaudeError::Api { status: status.as_u16(), message });
        }

        let body = response.text().await?;
        let message_response: MessageResponse = serde_json::from_str(&body)?;
        debug!(
            id = %message_response.id,
            output_tokens = message_response.usage.output_tokens,
            "Claude response received"
        );
        Ok(message_response)
    }

    /// Test the API key by sending a minimal request
    pub async fn test_connection(&self) -> Result<(), ClaudeError> {
        let request =
            CreateMessageRequest::new(self.model, vec![Message::user("Hi")]).with_max_tokens(10);

        self.send_message(request).await?;
        Ok(())
    }
}

impl TextGenerator for ClaudeClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ClaudeError> {
        let request = CreateMessageRequest::new(self.model, vec![Message::user(user_prompt)])
            .with_system(system_prompt)
            .with_max_tokens(Self::THEME_MAX_TOKENS);

        let response = self.send_message(request).await?;
        if response.truncated() {
            warn!(max_tokens = Self::THEME_MAX_TOKENS, "Theme answer hit the token cap");
        }
        let text = response.text();
        if text.trim().is_empty() {
            return Err(ClaudeError::Empty);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_client(server: &MockServer) -> ClaudeClient {
        let timeout = Duration::from_secs(5);
        ClaudeClient::new("sk-ant-test-key".to_string(), ClaudeModel::Haiku45, timeout)
            .unwrap()
            .with_base_url(&server.base_url())
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "id": "msg_01",
            "content": [{ "type": "text", "text": text }],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 120, "output_tokens": 40 }
        })
    }

    #[test]
    fn client_creation() {
        let timeout = Duration::from_secs(1);
        let client =
            ClaudeClient::new("sk-ant-test-key".to_string(), ClaudeModel::Opus45, timeout).unwrap();
        assert_eq!(client.api_key, "sk-ant-test-key");
        assert_eq!(client.api_url, "https://api.anthropic.com/v1/messages");
        assert_eq!(client.model(), ClaudeModel::Opus45);
    }

    #[tokio::test]
    async fn generate_returns_response_text() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/v1/messages")
                .header("x-api-key", "sk-ant-test-key")
                .header("anthropic-version", "2023-06-01");
            then.status(200).json_body(reply("{\"colors\": {}}"));
        });

        let text = test_client(&server).generate("system", "user").await.unwrap();
        assert_eq!(text, "{\"colors\": {}}");
        mock.assert();
    }

    #[tokio::test]
    async fn connection_check_sends_a_tiny_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/v1/messages")
                .body_includes(r#""max_tokens":10"#);
            then.status(200).json_body(reply("Hello"));
        });

        test_client(&server).test_connection().await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn unauthorized_maps_to_reauth() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/v1/messages");
            then.status(401).json_body(json!({ "error": "bad key" }));
        });

        let err = test_client(&server).generate("s", "u").await.unwrap_err();
        assert!(err.requires_reauth());
    }

    #[tokio::test]
    async fn rate_limit_reads_retry_after() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/v1/messages");
            then.status(429).header("retry-after", "7");
        });

        let err = test_client(&server).generate("s", "u").await.unwrap_err();
        assert!(matches!(err, ClaudeError::RateLimited { retry_after_seconds: 7 }));
    }

    #[tokio::test]
    async fn server_error_carries_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/v1/messages");
            then.status(529).body("overloaded");
        });

        let err = test_client(&server).generate("s", "u").await.unwrap_err();
        match err {
            ClaudeError::Api { status, message } => {
                assert_eq!(status, 529);
                assert_eq!(message, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_response_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/v1/messages");
            then.status(200).json_body(reply("  "));
        });

        let err = test_client(&server).generate("s", "u").await.unwrap_err();
        assert!(matches!(err, ClaudeError::Empty));
    }
}
