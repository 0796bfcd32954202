//! HTTP page fetcher. Implements PageFetcherPort with a single GET.

use crate::domain::DomainError;
use crate::ports::PageFetcherPort;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const USER_AGENT: &str = concat!("coldmail/", env!("CARGO_PKG_VERSION"));

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::Fetch(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

/// Only absolute http(s) URLs are fetchable.
pub fn parse_page_url(raw: &str) -> Result<Url, DomainError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DomainError::Input(format!("invalid URL '{}': {}", raw.trim(), e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DomainError::Input(format!(
            "unsupported URL scheme '{}' (expected http or https)",
            other
        ))),
    }
}

#[async_trait::async_trait]
impl PageFetcherPort for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        let url = parse_page_url(url)?;
        info!(url = %url, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DomainError::Fetch(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(url = %url, status = %status, "page fetch returned error status");
            return Err(DomainError::Fetch(format!("{} returned {}", url, status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Fetch(format!("failed to read body: {}", e)))?;

        info!(url = %url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
