//! Async HTTP client for the remote snapshot source.
//!
//! Plain reqwest with a browser user-agent and a request timeout. No retries:
//! a failed request is reported to the caller as-is.

use std::time::Duration;

use crate::config::IngestConfig;
use crate::types::IngestResult;

/// A fetched text page.
#[derive(Debug, Clone)]
pub struct HttpPage {
    /// URL the body was served from, after redirects.
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

/// HTTP client used for the listing page and the snapshot files.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout_ms: u64) -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &IngestConfig) -> IngestResult<Self> {
        Self::new(&config.user_agent, config.timeout_ms)
    }

    /// GET a page and read its body as text, whatever the status.
    pub async fn get_page(&self, url: &str) -> Result<HttpPage, reqwest::Error> {
        let r = self.client.get(url).send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await?;

        Ok(HttpPage {
            final_url,
            status,
            body,
        })
    }

    /// GET a resource without reading the body; callers stream it.
    pub async fn get_stream(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client.get(url).send().await
    }
}
