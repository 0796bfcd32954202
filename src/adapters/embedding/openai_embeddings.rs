//! OpenAI-compatible `/embeddings` client.

use crate::domain::DomainError;
use crate::ports::EmbeddingPort;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Remote embedding adapter (OpenAI, Azure, Ollama's OpenAI shim, ...).
pub struct OpenAiEmbeddingAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddingAdapter {
    /// * `api_url` - Full embeddings endpoint (e.g., "https://api.openai.com/v1/embeddings")
    /// * `model` - Embedding model (e.g., "text-embedding-3-small")
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Embedding(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

#[async_trait::async_trait]
impl EmbeddingPort for OpenAiEmbeddingAdapter {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "embedding API returned error");
            return Err(DomainError::Embedding(format!(
                "embedding HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let mut parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Embedding(format!("decode failed: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(DomainError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        // The API may return data out of order; `index` is authoritative when present.
        parsed.data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));

        debug!(
            count = parsed.data.len(),
            dim = parsed.data.first().map(|d| d.embedding.len()).unwrap_or(0),
            "received embeddings"
        );

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_embed_orders_by_index() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/embeddings")
                    .json_body_partial(r#"{"model": "text-embedding-3-small"}"#);
                then.status(200).json_body(json!({
                    "data": [
                        { "index": 1, "embedding": [0.0, 1.0] },
                        { "index": 0, "embedding": [1.0, 0.0] }
                    ]
                }));
            })
            .await;

        let adapter = OpenAiEmbeddingAdapter::new(
            server.url("/v1/embeddings"),
            "k".to_string(),
            "text-embedding-3-small".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        let out = adapter
            .embed(&["Go".to_string(), "Rust".to_string()])
            .await
            .unwrap();
        assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_embed_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/embeddings");
                then.status(500).body("boom");
            })
            .await;

        let adapter = OpenAiEmbeddingAdapter::new(
            server.url("/v1/embeddings"),
            "k".to_string(),
            "m".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = adapter.embed(&["Go".to_string()]).await.unwrap_err();
        assert!(matches!(err, DomainError::Embedding(_)));
    }
}
