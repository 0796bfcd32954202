//! Outreach composition: one job + matched links -> one email.

use crate::domain::{DomainError, Email, JobPosting};
use crate::ports::LlmPort;
use crate::usecases::prompts::{Persona, email_prompt};
use std::sync::Arc;
use tracing::{debug, info};

pub struct OutreachComposer {
    llm: Arc<dyn LlmPort>,
    persona: Persona,
}

impl OutreachComposer {
    pub fn new(llm: Arc<dyn LlmPort>, persona: Persona) -> Self {
        Self { llm, persona }
    }

    /// Write a cold email for `job` citing `links`.
    ///
    /// The model's answer is returned verbatim: no trimming, no link checks.
    pub async fn compose(&self, job: &JobPosting, links: &[String]) -> Result<Email, DomainError> {
        let job_json = serde_json::to_string_pretty(job)
            .map_err(|e| DomainError::Llm(format!("failed to render job: {}", e)))?;
        let prompt = email_prompt(&job_json, links, &self.persona);
        debug!(prompt_len = prompt.len(), links = links.len(), "composing email");

        let body = self.llm.generate(&prompt).await?;

        info!(role = %job.title(), email_len = body.len(), "email drafted");
        Ok(Email(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct EchoLlm {
        seen: Mutex<Option<String>>,
    }

    #[async_trait::async_trait]
    impl LlmPort for EchoLlm {
        async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
            *self.seen.lock().unwrap() = Some(prompt.to_string());
            Ok("  Dear team,\n\nSee https://example.com/case1\n".to_string())
        }
    }

    #[tokio::test]
    async fn test_compose_returns_model_output_verbatim() {
        let llm = Arc::new(EchoLlm {
            seen: Mutex::new(None),
        });
        let composer = OutreachComposer::new(llm.clone(), Persona::default());
        let job = JobPosting {
            role: Some("Senior Backend Engineer".into()),
            skills: Some(vec!["Go".into(), "Kubernetes".into(), "gRPC".into()]),
            ..Default::default()
        };

        let email = composer
            .compose(&job, &["https://example.com/case1".to_string()])
            .await
            .unwrap();

        assert_eq!(email.body(), "  Dear team,\n\nSee https://example.com/case1\n");

        let prompt = llm.seen.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Senior Backend Engineer"));
        assert!(prompt.contains("gRPC"));
        assert!(prompt.contains("https://example.com/case1"));
    }
}
