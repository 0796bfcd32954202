//! Implements ReportPort. Writes one Markdown file per pipeline run.

use crate::domain::{DomainError, OutcomeResult, PipelineReport, RunStatus};
use crate::ports::ReportPort;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// A backtick fence longer than any backtick run inside `body`, so the body cannot close it.
fn code_fence(body: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in body.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn write_err(e: std::io::Error) -> DomainError {
    DomainError::Report(format!("Failed to write report: {}", e))
}

pub struct MarkdownReportWriter {
    output_dir: PathBuf,
}

impl MarkdownReportWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Render the run as Markdown. Emails go in fenced blocks so the model's own
    /// formatting is shown verbatim.
    pub fn render(source: &str, report: &PipelineReport, generated_at: DateTime<Utc>) -> String {
        let mut md = String::new();

        md.push_str("# Outreach Drafts\n\n");
        md.push_str(&format!(
            "**Source:** {} | **Generated:** {}\n\n",
            source,
            generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        if report.status == RunStatus::NoPostingsFound {
            md.push_str("No job postings were found on this page.\n");
            return md;
        }

        md.push_str(&format!(
            "**Jobs:** {} | **Drafted:** {} | **Failed:** {}\n\n",
            report.outcomes.len(),
            report.succeeded(),
            report.failed()
        ));
        md.push_str("---\n\n");

        for outcome in &report.outcomes {
            let job = &outcome.job;
            md.push_str(&format!("## {}. {}\n\n", outcome.index + 1, job.title()));

            if let Some(exp) = &job.experience {
                md.push_str(&format!("- **Experience:** {}\n", exp));
            }
            if !job.skills_or_empty().is_empty() {
                md.push_str(&format!("- **Skills:** {}\n", job.skills_or_empty().join(", ")));
            }

            match &outcome.result {
                OutcomeResult::Drafted { links, email } => {
                    if !links.is_empty() {
                        md.push_str("- **Matched portfolio:**\n");
                        for link in links {
                            md.push_str(&format!("  - {}\n", link));
                        }
                    }
                    let body = email.body().trim_end();
                    let fence = code_fence(body);
                    md.push_str(&format!("\n{}text\n{}\n{}\n\n", fence, body, fence));
                }
                OutcomeResult::Failed { error } => {
                    md.push_str(&format!("\n> **Failed:** {}\n\n", error));
                }
            }
        }

        md.push_str("---\n");
        md.push_str("*Generated by coldmail*\n");
        md
    }
}

#[async_trait::async_trait]
impl ReportPort for MarkdownReportWriter {
    async fn save_report(
        &self,
        source: &str,
        report: &PipelineReport,
    ) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| DomainError::Report(format!("Failed to create output dir: {}", e)))?;

        let now = Utc::now();
        let stem = format!("outreach_{}", now.format("%Y%m%d_%H%M%S_%3f"));
        let content = Self::render(source, report, now);

        // create_new: never clobber an earlier report written in the same millisecond.
        let mut attempt = 0u32;
        let path = loop {
            let name = if attempt == 0 {
                format!("{}.md", stem)
            } else {
                format!("{}_{}.md", stem, attempt)
            };
            let path = self.output_dir.join(name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(content.as_bytes()).await.map_err(write_err)?;
                    file.flush().await.map_err(write_err)?;
                    break path;
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && attempt < 100 => {
                    attempt += 1;
                }
                Err(e) => return Err(write_err(e)),
            }
        };

        info!(path = %path.display(), "report generated");
        Ok(path)
    }
}
