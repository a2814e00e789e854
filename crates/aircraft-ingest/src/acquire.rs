//! Acquisition orchestrator: listing page → candidates → bounded fetch.

use crate::config::IngestConfig;
use crate::extract::extract_candidates;
use crate::fallback::generate_day_candidates;
use crate::fetcher::BatchFetcher;
use crate::http_client::HttpClient;
use crate::store::ContentStore;
use crate::types::{Candidates, IngestError, IngestResult, RunSummary};

/// Default number of snapshots acquired per run.
pub const DEFAULT_FILE_LIMIT: i64 = 100;

/// Pick the candidate list for a listing page.
///
/// Scraped links win whenever there is at least one; otherwise the full
/// deterministic enumeration for the day is used.
pub fn resolve_candidates(html: &str) -> Candidates {
    let scraped = extract_candidates(html);
    if scraped.is_empty() {
        Candidates::Generated(generate_day_candidates())
    } else {
        Candidates::Scraped(scraped)
    }
}

/// Convert a caller-supplied limit into a batch size; non-positive means none.
pub fn clamp_limit(file_limit: i64) -> usize {
    usize::try_from(file_limit).unwrap_or(0)
}

/// One acquisition run over borrowed configuration and clients.
#[derive(Debug, Clone, Copy)]
pub struct Acquirer<'a> {
    config: &'a IngestConfig,
    client: &'a HttpClient,
    store: &'a ContentStore,
}

impl<'a> Acquirer<'a> {
    pub fn new(config: &'a IngestConfig, client: &'a HttpClient, store: &'a ContentStore) -> Self {
        Self {
            config,
            client,
            store,
        }
    }

    /// Acquire up to `file_limit` snapshots for the configured day.
    ///
    /// Only a failure to retrieve the listing page is an error. Per-item
    /// failures are reported in the returned summary.
    pub async fn run(&self, file_limit: i64) -> IngestResult<RunSummary> {
        let listing_url = self.config.listing_url();
        let prefix = self.config.raw_prefix();

        tracing::info!(
            url = %listing_url,
            store = self.store.label(),
            file_limit,
            "Starting snapshot download"
        );

        let page = self
            .client
            .get_page(&listing_url)
            .await
            .map_err(|source| IngestError::ListingPage {
                url: listing_url.clone(),
                source,
            })?;
        if page.final_url != listing_url {
            tracing::info!(final_url = %page.final_url, "Listing page was redirected");
        }
        if !(200..300).contains(&page.status) {
            tracing::warn!(status = page.status, "Listing page returned non-success status");
        }

        let candidates = resolve_candidates(&page.body);
        match &candidates {
            Candidates::Scraped(names) => {
                tracing::info!(links = names.len(), "Found snapshot links on listing page");
            }
            Candidates::Generated(names) => {
                tracing::info!(
                    generated = names.len(),
                    "Listing page had no snapshot links, using generated filenames"
                );
            }
        }

        let fetcher = BatchFetcher::new(self.client, self.store, &listing_url, &prefix);
        let report = fetcher.fetch(candidates.names(), clamp_limit(file_limit)).await;

        let summary = RunSummary::from_batch(candidates.source(), candidates.len(), report);
        tracing::info!(
            total = summary.total,
            attempted = summary.attempted,
            stored = summary.stored,
            "Snapshot download done"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::SNAPSHOTS_PER_DAY;
    use crate::types::CandidateSource;

    #[test]
    fn test_scraped_links_skip_generation() {
        let html = r#"<a href="000000Z.json.gz">a</a><a href="000005Z.json.gz">b</a>"#;
        let candidates = resolve_candidates(html);
        assert_eq!(candidates.source(), CandidateSource::Scraped);
        assert_eq!(candidates.names(), ["000000Z.json.gz", "000005Z.json.gz"]);
    }

    #[test]
    fn test_empty_page_uses_full_enumeration() {
        let candidates = resolve_candidates("<html><body>blocked</body></html>");
        assert_eq!(candidates, Candidates::Generated(generate_day_candidates()));
        assert_eq!(candidates.len(), SNAPSHOTS_PER_DAY);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(100), 100);
        assert_eq!(clamp_limit(0), 0);
        assert_eq!(clamp_limit(-5), 0);
        assert_eq!(clamp_limit(i64::MIN), 0);
    }
}
