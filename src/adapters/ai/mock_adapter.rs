//! Mock LLM adapter for running the pipeline without API calls.
//!
//! Returns canned responses for development and testing purposes.

use crate::domain::DomainError;
use crate::ports::LlmPort;
use crate::usecases::prompts::EXTRACTION_HEADER;
use std::time::Duration;
use tracing::info;

/// Canned extraction result: one posting, shaped like a real model answer.
const MOCK_EXTRACTION: &str = r#"```json
[
  {
    "role": "[MOCK] Software Engineer",
    "experience": "3+ years",
    "skills": ["Rust", "PostgreSQL", "Kubernetes"],
    "description": "Simulated posting produced by the mock adapter. Configure a real API key to extract jobs from the page."
  }
]
```"#;

/// Mock LLM adapter.
///
/// Answers extraction prompts with a fixed JSON posting and composition prompts with an
/// email that cites every link found in the prompt. Simulates network latency.
pub struct MockLlmAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockLlmAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    fn mock_email(prompt: &str) -> String {
        let links: Vec<&str> = prompt
            .split(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '[' | ']'))
            .filter(|t| t.starts_with("http://") || t.starts_with("https://"))
            .collect();

        let mut body = String::from(
            "Subject: [MOCK] Helping your team ship faster\n\n\
             Hi there,\n\n\
             I noticed you are hiring and wanted to share how we have delivered similar work. \
             This is a simulated email from the mock adapter.\n",
        );
        if !links.is_empty() {
            body.push_str("\nRelevant case studies:\n");
            for link in links {
                body.push_str(&format!("- {}\n", link));
            }
        }
        body.push_str("\nBest regards,\n[MOCK] Business Development\n");
        body
    }
}

impl Default for MockLlmAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmPort for MockLlmAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        info!(prompt_len = prompt.len(), "[MOCK] Simulating LLM call");

        // Simulate network delay
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        if prompt.contains(EXTRACTION_HEADER) {
            Ok(MOCK_EXTRACTION.to_string())
        } else {
            Ok(Self::mock_email(prompt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::prompts::extraction_prompt;

    #[tokio::test]
    async fn test_mock_adapter_extraction() {
        let adapter = MockLlmAdapter::with_delay(1);
        let out = adapter
            .generate(&extraction_prompt("We are hiring a Rust engineer"))
            .await
            .unwrap();
        assert!(out.contains("\"role\""));
    }

    #[tokio::test]
    async fn test_mock_adapter_email_cites_links() {
        let adapter = MockLlmAdapter::with_delay(1);
        let out = adapter
            .generate("Write an email. Links: [\"https://example.com/case1\"]")
            .await
            .unwrap();
        assert!(out.contains("https://example.com/case1"));
    }
}
