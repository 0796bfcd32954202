//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, PipelineReport, PortfolioEntry};
use std::path::PathBuf;

/// Language model capability: plain text in, plain text out.
#[async_trait::async_trait]
pub trait LlmPort: Send + Sync {
    /// Send one prompt and return the model's raw text response.
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
}

/// Embedding capability. Vectors returned in input order, one per text.
#[async_trait::async_trait]
pub trait EmbeddingPort: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;
}

/// Page retrieval. Returns the raw body of the page at `url`.
#[async_trait::async_trait]
pub trait PageFetcherPort: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, DomainError>;
}

/// Static source of portfolio case studies. Read at build time and on reload.
#[async_trait::async_trait]
pub trait CatalogPort: Send + Sync {
    async fn load_entries(&self) -> Result<Vec<PortfolioEntry>, DomainError>;
}

/// Persists a finished run for the user to read later.
#[async_trait::async_trait]
pub trait ReportPort: Send + Sync {
    /// Save the report and return where it was written.
    ///
    /// * `source` - The careers page URL (or other label) the run was made for
    async fn save_report(
        &self,
        source: &str,
        report: &PipelineReport,
    ) -> Result<PathBuf, DomainError>;
}
