//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/LLM types here; adapters and use cases map into these.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::DomainError;

/// One job posting extracted from a careers page.
///
/// Every field is optional: the model decides what it emits and nothing downstream may
/// assume a key is present. Keys outside the known four are kept in `extra` so the
/// composer still sees them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobPosting {
    /// Build a posting from whatever JSON value the model produced for one job.
    ///
    /// Never fails: non-object values yield a posting with all fields absent.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        let role = map.remove("role").and_then(value_to_text);
        let experience = map.remove("experience").and_then(value_to_text);
        let skills = map.remove("skills").and_then(value_to_skills);
        let description = map.remove("description").and_then(value_to_text);

        Self {
            role,
            experience,
            skills,
            description,
            extra: map,
        }
    }

    /// Skills for matching; empty when the model omitted them.
    pub fn skills_or_empty(&self) -> &[String] {
        self.skills.as_deref().unwrap_or(&[])
    }

    /// Short label for logs and report headings.
    pub fn title(&self) -> &str {
        self.role.as_deref().unwrap_or("Untitled role")
    }

    /// True when the model returned an object with nothing in it.
    pub fn is_blank(&self) -> bool {
        self.role.is_none()
            && self.experience.is_none()
            && self.skills.is_none()
            && self.description.is_none()
            && self.extra.is_empty()
    }
}

/// Render a scalar JSON value as text. Null and blank strings count as absent.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Accept either a list of skills or a single comma-separated string.
fn value_to_skills(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(items.into_iter().filter_map(value_to_text).collect()),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        other => value_to_text(other).map(|s| vec![s]),
    }
}

/// A portfolio case study: the skills it demonstrates and where to read about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub skills: Vec<String>,
    pub link: String,
}

impl PortfolioEntry {
    /// Rejects entries without a link; skills may be empty.
    pub fn new(skills: Vec<String>, link: impl Into<String>) -> Result<Self, DomainError> {
        let link = link.into().trim().to_string();
        if link.is_empty() {
            return Err(DomainError::Catalog(
                "portfolio entry has an empty link".to_string(),
            ));
        }
        let skills = skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(Self { skills, link })
    }

    /// Text submitted to the embedder for this entry.
    pub fn skills_text(&self) -> String {
        self.skills.join(", ")
    }
}

/// Plain-text email body, exactly as the model wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(pub String);

impl Email {
    pub fn body(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of processing one extracted job.
#[derive(Debug)]
pub struct JobOutcome {
    /// Position in extraction order (0-based).
    pub index: usize,
    pub job: JobPosting,
    pub result: OutcomeResult,
}

#[derive(Debug)]
pub enum OutcomeResult {
    Drafted { links: Vec<String>, email: Email },
    Failed { error: DomainError },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.result, OutcomeResult::Drafted { .. })
    }

    pub fn email(&self) -> Option<&Email> {
        match &self.result {
            OutcomeResult::Drafted { email, .. } => Some(email),
            OutcomeResult::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Extraction succeeded but found nothing job-shaped. Not an error.
    NoPostingsFound,
}

/// Everything one pipeline run produced, in extraction order.
#[derive(Debug)]
pub struct PipelineReport {
    pub status: RunStatus,
    pub outcomes: Vec<JobOutcome>,
}

impl PipelineReport {
    pub fn no_postings() -> Self {
        Self {
            status: RunStatus::NoPostingsFound,
            outcomes: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_object() {
        let job = JobPosting::from_value(json!({
            "role": "Senior Backend Engineer",
            "experience": "5+ years",
            "skills": ["Go", "Kubernetes", "gRPC"],
            "description": "Build services.",
            "location": "Remote"
        }));

        assert_eq!(job.role.as_deref(), Some("Senior Backend Engineer"));
        assert_eq!(job.skills_or_empty(), ["Go", "Kubernetes", "gRPC"]);
        assert_eq!(job.extra.get("location"), Some(&json!("Remote")));
    }

    #[test]
    fn test_from_value_tolerates_odd_shapes() {
        let job = JobPosting::from_value(json!({
            "role": "Data Engineer",
            "experience": 3,
            "skills": "Python, SQL , ,Airflow",
            "description": null
        }));

        assert_eq!(job.experience.as_deref(), Some("3"));
        assert_eq!(job.skills_or_empty(), ["Python", "SQL", "Airflow"]);
        assert!(job.description.is_none());
    }

    #[test]
    fn test_from_value_missing_skills() {
        let job = JobPosting::from_value(json!({ "role": "Designer" }));
        assert!(job.skills.is_none());
        assert!(job.skills_or_empty().is_empty());
        assert!(!job.is_blank());
    }

    #[test]
    fn test_from_value_non_object() {
        let job = JobPosting::from_value(json!("just a string"));
        assert!(job.is_blank());
        assert_eq!(job.title(), "Untitled role");
    }

    #[test]
    fn test_portfolio_entry_requires_link() {
        assert!(PortfolioEntry::new(vec!["Rust".into()], "  ").is_err());

        let entry = PortfolioEntry::new(vec![" Go ".into(), "".into()], "https://x.dev/a").unwrap();
        assert_eq!(entry.skills, vec!["Go".to_string()]);
        assert_eq!(entry.skills_text(), "Go");
    }
}
