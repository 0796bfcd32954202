//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// The extraction response was not JSON. Fatal to the run; never retried.
    #[error("Context too big. Unable to parse jobs: {0}")]
    ExtractionParse(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    /// A per-job deadline expired before matching and composition finished.
    #[error("Timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// A per-job task panicked or was cancelled.
    #[error("Job task failed: {0}")]
    Task(String),

    #[error("Page fetch failed: {0}")]
    Fetch(String),

    #[error("Portfolio catalog error: {0}")]
    Catalog(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Input error: {0}")]
    Input(String),
}
