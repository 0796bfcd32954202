//! Structured extraction: careers-page text -> job postings.
//!
//! One model call per page. The response goes through a strict JSON parser after code
//! fences are stripped; malformed output is reported, never retried.

use crate::domain::{DomainError, JobPosting};
use crate::ports::LlmPort;
use crate::usecases::prompts::extraction_prompt;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StructuredExtractor {
    llm: Arc<dyn LlmPort>,
}

impl StructuredExtractor {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    /// Extract job postings from cleaned page text.
    ///
    /// # Errors
    /// * `DomainError::ExtractionParse` - the model's answer was not valid JSON
    /// * whatever the `LlmPort` returned if the call itself failed
    pub async fn extract(&self, text: &str) -> Result<Vec<JobPosting>, DomainError> {
        info!(text_len = text.len(), "extracting job postings");

        let raw = self.llm.generate(&extraction_prompt(text)).await?;
        let jobs = parse_postings(&raw)?;

        info!(jobs = jobs.len(), "extraction complete");
        Ok(jobs)
    }
}

/// Decode the model's raw answer into postings.
///
/// Array -> one posting per element; any object (even `{}`) -> a single posting.
/// `null` and `[]` mean the page had no postings.
pub fn parse_postings(raw: &str) -> Result<Vec<JobPosting>, DomainError> {
    let json = extract_json_block(raw);
    let value: Value = serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, json = %json.chars().take(200).collect::<String>(), "JSON parse failed");
        DomainError::ExtractionParse(e.to_string())
    })?;

    let postings = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(JobPosting::from_value).collect(),
        other => vec![JobPosting::from_value(other)],
    };

    let blank = postings.iter().filter(|p| p.is_blank()).count();
    if blank > 0 {
        warn!(blank, total = postings.len(), "model returned postings with no fields");
    }
    debug!(count = postings.len(), "decoded postings");
    Ok(postings)
}

/// Locate the JSON payload in a model answer.
///
/// Prefers the first ``` fenced block anywhere in the text (language tag optional). Without
/// a fence, falls back to the outermost `[...]` or `{...}` span so a prose preamble does
/// not sink the parse. Anything else is returned trimmed for the strict parser to reject.
fn extract_json_block(text: &str) -> &str {
    let text = text.trim();

    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        let body = after
            .strip_prefix("json")
            .or_else(|| after.strip_prefix("JSON"))
            .unwrap_or(after);
        return match body.find("```") {
            Some(end) => body[..end].trim(),
            None => body.trim(),
        };
    }

    if text.starts_with('[') || text.starts_with('{') {
        return text;
    }
    let open = match text.find(['[', '{']) {
        Some(i) => i,
        None => return text,
    };
    let close = if text[open..].starts_with('[') { ']' } else { '}' };
    match text.rfind(close) {
        Some(end) if end > open => &text[open..=end],
        _ => text,
    }
}
