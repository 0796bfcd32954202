//! Implements CatalogPort from a flat CSV file.
//!
//! Expected header: `Techstack,Links`. The Techstack cell holds comma-separated skills
//! (quoted by the CSV writer), e.g. `"React, Node.js, MongoDB",https://example.com/portfolio/1`.

use crate::domain::{DomainError, PortfolioEntry};
use crate::ports::CatalogPort;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Techstack", alias = "techstack", alias = "skills", default)]
    techstack: String,
    #[serde(rename = "Links", alias = "links", alias = "link", default)]
    links: String,
}

/// CSV-backed portfolio catalog. The file is re-read on every load, so a reload picks up edits.
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse catalog rows from any CSV reader. Rows without a link are skipped with a warning.
    pub fn parse<R: std::io::Read>(reader: R) -> Result<Vec<PortfolioEntry>, DomainError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut entries = Vec::new();

        for (line, row) in rdr.deserialize::<CatalogRow>().enumerate() {
            let row = row.map_err(|e| DomainError::Catalog(format!("bad CSV row: {}", e)))?;
            let skills = row
                .techstack
                .split(',')
                .map(|s| s.to_string())
                .collect::<Vec<_>>();
            match PortfolioEntry::new(skills, row.links) {
                Ok(entry) => entries.push(entry),
                // +2: header row and 1-based numbering
                Err(e) => warn!(row = line + 2, error = %e, "skipping catalog row"),
            }
        }

        Ok(entries)
    }
}

#[async_trait::async_trait]
impl CatalogPort for CsvCatalog {
    async fn load_entries(&self) -> Result<Vec<PortfolioEntry>, DomainError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            DomainError::Catalog(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let entries = Self::parse(bytes.as_slice())?;
        info!(
            path = %self.path.display(),
            entries = entries.len(),
            "loaded portfolio catalog"
        );
        Ok(entries)
    }
}
