//! Live adapter for the `LlmClient` port using the Anthropic messages API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Assistant backend calling the Anthropic messages API.
pub struct LiveLlmClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl LiveLlmClient {
    /// Creates a client. Without a key every completion fails with a clear
    /// message instead of reaching the network.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self { client: Client::new(), api_key, endpoint: ANTHROPIC_API_URL.to_string() }
    }

    /// Points the client at a different messages endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn send(&self, request: CompletionRequest) -> Result<CompletionResponse, BoxError> {
        let api_key = self.api_key.as_deref().ok_or("ANTHROPIC_API_KEY is not set")?;

        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
            messages: vec![Message { role: "user", content: &request.prompt }],
        };
        debug!(model = %request.model, max_tokens = request.max_tokens, "sending completion");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Assistant API request failed: {e}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read assistant API response: {e}"))?;

        if !status.is_success() {
            let msg = serde_json::from_str::<ApiError>(&text).map(|e| e.error.message).unwrap_or(text);
            return Err(format!("Assistant API error ({}): {msg}", status.as_u16()).into());
        }

        parse_response(&text)
    }
}

/// Request body sent to the messages API.
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

/// A single conversation message.
#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Top-level response from the messages API.
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

/// A content block; only text blocks carry `text`.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Token usage.
#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Error response body.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn parse_response(text: &str) -> Result<CompletionResponse, BoxError> {
    let parsed: MessagesResponse = serde_json::from_str(text)
        .map_err(|e| format!("Failed to parse assistant API response: {e}"))?;
    Ok(CompletionResponse {
        text: parsed.content.into_iter().filter_map(|block| block.text).collect(),
        prompt_tokens: parsed.usage.input_tokens,
        completion_tokens: parsed.usage.output_tokens,
    })
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        Box::pin(self.send(request.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "claude-sonnet-4-20250514".into(),
            system: Some("You are the portal assistant.".into()),
            prompt: "What is next?".into(),
            max_tokens: 64,
        }
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let client = LiveLlmClient::new(None).with_endpoint("http://127.0.0.1:9/v1/messages");
        let err = client.complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn request_body_includes_system_only_when_set() {
        let req = request();
        let body = MessagesRequest {
            model: &req.model,
            max_tokens: req.max_tokens,
            system: None,
            messages: vec![Message { role: "user", content: &req.prompt }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("system").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn parse_response_joins_text_blocks() {
        let parsed = parse_response(
            r#"{"content": [{"type": "text", "text": "Upload "}, {"type": "tool_use"}, {"type": "text", "text": "the W-9."}],
                "usage": {"input_tokens": 12, "output_tokens": 5}}"#,
        )
        .unwrap();
        assert_eq!(parsed.text, "Upload the W-9.");
        assert_eq!(parsed.prompt_tokens, 12);
        assert_eq!(parsed.completion_tokens, 5);
    }
}
