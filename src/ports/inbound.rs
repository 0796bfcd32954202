//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: CLI invokes the outreach pipeline.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Ask for (or read) a careers page URL, run the pipeline, and present the emails.
    async fn run(&self) -> Result<(), DomainError>;
}
