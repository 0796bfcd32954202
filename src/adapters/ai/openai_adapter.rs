//! OpenAI-compatible chat completions adapter.
//!
//! Works against OpenAI, Groq, Azure OpenAI and local Ollama instances.
//! Implements `LlmPort` as a single plain-text round trip: no retries, no streaming.

use crate::domain::DomainError;
use crate::ports::LlmPort;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// OpenAI-compatible LLM adapter.
///
/// Can be configured to work with:
/// - Groq (api.groq.com/openai), the default
/// - OpenAI API (api.openai.com)
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - Chat completions endpoint (e.g., "https://api.groq.com/openai/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "llama-3.1-70b-versatile", "gpt-4o-mini")
    /// * `timeout` - Per-request deadline; a slow model surfaces as an error instead of hanging
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Llm(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
            temperature: 0.0,
        })
    }

    /// Override sampling temperature (default 0 for reproducible extraction).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait::async_trait]
impl LlmPort for OpenAiAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            "sending prompt to LLM"
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Llm(format!("request timed out: {}", e))
                } else {
                    DomainError::Llm(format!("HTTP request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "LLM API returned error");
            return Err(DomainError::Llm(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Llm(format!("Failed to parse API response: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::Llm("No response choices returned".to_string()))?;

        debug!(raw_len = content.len(), "received LLM response");

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn adapter(url: String) -> OpenAiAdapter {
        OpenAiAdapter::new(
            url,
            "test-key".to_string(),
            "llama-3.1-70b-versatile".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("Authorization", "Bearer test-key")
                    .json_body_partial(r#"{"model": "llama-3.1-70b-versatile", "temperature": 0.0}"#);
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "Hello there" } }]
                }));
            })
            .await;

        let out = adapter(server.url("/v1/chat/completions"))
            .generate("Say hello")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(out, "Hello there");
    }

    #[tokio::test]
    async fn test_generate_maps_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429).body("rate limited");
            })
            .await;

        let err = adapter(server.url("/v1/chat/completions"))
            .generate("anything")
            .await
            .unwrap_err();

        match err {
            DomainError::Llm(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("rate limited"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_without_choices_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let err = adapter(server.url("/v1/chat/completions"))
            .generate("anything")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Llm(_)));
    }
}
