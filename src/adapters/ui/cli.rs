//! Implements InputPort. Reads the careers URL (argv or inquire prompt), runs the
//! pipeline behind a spinner, prints every email and saves a Markdown report.

use crate::adapters::ui::progress::spinner;
use crate::adapters::web::fetcher::parse_page_url;
use crate::domain::{DomainError, OutcomeResult, PipelineReport, RunStatus};
use crate::ports::{InputPort, ReportPort};
use crate::usecases::OutreachPipeline;
use async_trait::async_trait;
use inquire::Text;
use inquire::ui::{Color, RenderConfig, Styled};
use std::sync::Arc;
use tracing::info;

/// Applies the prompt theme for every subsequent inquire prompt.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("✉").with_fg(Color::LightCyan))
        .with_answered_prompt_prefix(Styled::new("✔").with_fg(Color::LightGreen));
    inquire::set_global_render_config(config);
}

pub struct CliInputPort {
    pipeline: Arc<OutreachPipeline>,
    reports: Arc<dyn ReportPort>,
    /// URL given on the command line; prompted for when absent.
    url: Option<String>,
}

impl CliInputPort {
    pub fn new(
        pipeline: Arc<OutreachPipeline>,
        reports: Arc<dyn ReportPort>,
        url: Option<String>,
    ) -> Self {
        Self {
            pipeline,
            reports,
            url,
        }
    }

    fn read_url(&self) -> Result<String, DomainError> {
        let raw = match &self.url {
            Some(u) => u.clone(),
            None => Text::new("Careers page URL:")
                .with_placeholder("https://example.com/careers")
                .prompt()
                .map_err(|e| DomainError::Input(e.to_string()))?,
        };
        Ok(parse_page_url(&raw)?.to_string())
    }
}

/// Render the run for the terminal.
pub fn format_report(report: &PipelineReport) -> String {
    if report.status == RunStatus::NoPostingsFound {
        return "No job postings were found at the provided URL.\n".to_string();
    }

    let mut out = format!(
        "Found {} job(s): {} drafted, {} failed.\n",
        report.outcomes.len(),
        report.succeeded(),
        report.failed()
    );
    for outcome in &report.outcomes {
        out.push_str(&format!(
            "\n=== {}. {} ===\n",
            outcome.index + 1,
            outcome.job.title()
        ));
        match &outcome.result {
            OutcomeResult::Drafted { email, .. } => {
                out.push_str(email.body().trim_end());
                out.push('\n');
            }
            OutcomeResult::Failed { error } => {
                out.push_str(&format!("[failed] {}\n", error));
            }
        }
    }
    out
}

#[async_trait]
impl InputPort for CliInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let url = self.read_url()?;

        let pb = spinner(format!("Extracting jobs and drafting emails for {}", url));
        let result = self.pipeline.run_url(&url).await;
        pb.finish_and_clear();
        let report = result?;

        print!("{}", format_report(&report));

        let path = self.reports.save_report(&url, &report).await?;
        info!(path = %path.display(), "saved outreach report");
        println!("\nReport saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, JobOutcome, JobPosting};

    #[test]
    fn test_format_report_lists_emails_and_failures() {
        let report = PipelineReport {
            status: RunStatus::Completed,
            outcomes: vec![
                JobOutcome {
                    index: 0,
                    job: JobPosting {
                        role: Some("SRE".into()),
                        ..Default::default()
                    },
                    result: OutcomeResult::Drafted {
                        links: vec![],
                        email: Email("Hi!\n".into()),
                    },
                },
                JobOutcome {
                    index: 1,
                    job: JobPosting::default(),
                    result: OutcomeResult::Failed {
                        error: DomainError::Timeout { seconds: 5 },
                    },
                },
            ],
        };

        let text = format_report(&report);
        assert!(text.starts_with("Found 2 job(s): 1 drafted, 1 failed."));
        assert!(text.contains("=== 1. SRE ===\nHi!\n"));
        assert!(text.contains("[failed] Timed out after 5 seconds"));
    }

    #[test]
    fn test_format_report_no_postings() {
        assert!(format_report(&PipelineReport::no_postings()).contains("No job postings"));
    }
}
