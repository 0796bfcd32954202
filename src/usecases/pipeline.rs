//! Outreach pipeline. Orchestrates extraction, portfolio matching and email composition.
//!
//! Orchestrates the flow:
//! 1. (optional) Fetch and clean the careers page
//! 2. Extract job postings (one LLM call; failure aborts the run)
//! 3. For each job: query the portfolio index, then compose an email
//! 4. Collect one outcome per job, in extraction order
//!
//! Per-job failures (embedding, LLM, deadline, even a panic) are recorded on that job's
//! outcome and never stop its siblings.

use crate::adapters::web::clean_text;
use crate::domain::{
    DomainError, Email, JobOutcome, JobPosting, OutcomeResult, PipelineReport, RunStatus,
};
use crate::ports::PageFetcherPort;
use crate::usecases::composer::OutreachComposer;
use crate::usecases::extractor::StructuredExtractor;
use crate::usecases::portfolio_index::PortfolioIndex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Tuning knobs for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Deadline for matching + composing a single job.
    pub job_timeout: Duration,
    /// How many jobs may be matched/composed at once. 1 = strictly sequential.
    pub concurrency: usize,
    /// Page text is capped to this many characters before extraction.
    pub max_page_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            job_timeout: Duration::from_secs(120),
            concurrency: 1,
            max_page_chars: 20_000,
        }
    }
}

pub struct OutreachPipeline {
    extractor: StructuredExtractor,
    index: Arc<PortfolioIndex>,
    composer: Arc<OutreachComposer>,
    fetcher: Option<Arc<dyn PageFetcherPort>>,
    options: PipelineOptions,
}

impl OutreachPipeline {
    pub fn new(
        extractor: StructuredExtractor,
        index: Arc<PortfolioIndex>,
        composer: Arc<OutreachComposer>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            extractor,
            index,
            composer,
            fetcher: None,
            options,
        }
    }

    /// Attach a page fetcher so `run_url` can be used.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcherPort>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Fetch `url`, clean the page, and run the pipeline on the result.
    ///
    /// Fetch failures are fatal: there is no page text to work with.
    pub async fn run_url(&self, url: &str) -> Result<PipelineReport, DomainError> {
        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| DomainError::Fetch("no page fetcher configured".to_string()))?;
        let raw = fetcher.fetch(url).await?;
        let text = clean_text(&raw, self.options.max_page_chars);
        info!(url, raw_len = raw.len(), clean_len = text.len(), "page cleaned");
        self.run(&text).await
    }

    /// Run the pipeline on already-cleaned page text.
    ///
    /// Returns `Err` only when extraction fails. Every extracted job gets an outcome.
    pub async fn run(&self, page_text: &str) -> Result<PipelineReport, DomainError> {
        let jobs = self.extractor.extract(page_text).await?;
        if jobs.is_empty() {
            warn!("no job postings found in page text");
            return Ok(PipelineReport::no_postings());
        }

        info!(jobs = jobs.len(), "processing extracted jobs");

        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs.iter().cloned() {
            let sem = Arc::clone(&semaphore);
            let portfolio = Arc::clone(&self.index);
            let composer = Arc::clone(&self.composer);
            let timeout = self.options.job_timeout;

            handles.push(tokio::spawn(async move {
                // The semaphore is never closed, so acquire only fails if that changes.
                let _permit = sem.acquire_owned().await.ok();
                match tokio::time::timeout(timeout, draft_one(&portfolio, &composer, &job)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(DomainError::Timeout {
                        seconds: timeout.as_secs(),
                    }),
                }
            }));
        }

        // Await in spawn order so outcomes keep extraction order.
        let mut outcomes = Vec::with_capacity(jobs.len());
        for ((index, handle), job) in handles.into_iter().enumerate().zip(jobs) {
            let result = match handle.await {
                Ok(Ok((links, email))) => OutcomeResult::Drafted { links, email },
                Ok(Err(error)) => {
                    warn!(job = index, role = %job.title(), error = %error, "job failed");
                    OutcomeResult::Failed { error }
                }
                Err(join_err) => {
                    error!(job = index, error = %join_err, "job task aborted");
                    OutcomeResult::Failed {
                        error: DomainError::Task(join_err.to_string()),
                    }
                }
            };
            outcomes.push(JobOutcome { index, job, result });
        }

        let report = PipelineReport {
            status: RunStatus::Completed,
            outcomes,
        };
        info!(
            drafted = report.succeeded(),
            failed = report.failed(),
            "pipeline run complete"
        );
        Ok(report)
    }
}

async fn draft_one(
    index: &PortfolioIndex,
    composer: &OutreachComposer,
    job: &JobPosting,
) -> Result<(Vec<String>, Email), DomainError> {
    let links = index.query_links(job.skills_or_empty()).await?;
    let email = composer.compose(job, &links).await?;
    Ok((links, email))
}
