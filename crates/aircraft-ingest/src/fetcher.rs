//! Bounded, sequential batch fetch from the remote source into the store.
//!
//! Candidates are fetched one at a time in list order. A failed item is
//! logged and recorded as a skip; it never aborts the batch.

use crate::http_client::HttpClient;
use crate::store::{object_key, ContentStore};
use crate::types::{BatchReport, FetchOutcome, SkipReason, SkippedItem};

/// Stored items between progress log lines.
const PROGRESS_EVERY: usize = 50;

/// Where fetched candidates come from and where they go.
#[derive(Debug, Clone)]
pub struct BatchFetcher<'a> {
    client: &'a HttpClient,
    store: &'a ContentStore,
    /// Base URL relative names are appended to; ends with `/`.
    base_url: &'a str,
    /// Storage prefix, e.g. `raw/day=20231101`.
    key_prefix: &'a str,
}

impl<'a> BatchFetcher<'a> {
    pub fn new(
        client: &'a HttpClient,
        store: &'a ContentStore,
        base_url: &'a str,
        key_prefix: &'a str,
    ) -> Self {
        Self {
            client,
            store,
            base_url,
            key_prefix,
        }
    }

    /// Absolute URL for a candidate. Names that already are URLs pass through.
    pub fn resolve_url(&self, name: &str) -> String {
        if name.starts_with("http") {
            name.to_string()
        } else {
            format!("{}{}", self.base_url, name)
        }
    }

    /// Fetch the first `limit` candidates and store every success.
    pub async fn fetch(&self, names: &[String], limit: usize) -> BatchReport {
        let batch = &names[..names.len().min(limit)];
        let mut report = BatchReport {
            attempted: batch.len(),
            ..BatchReport::default()
        };

        tracing::info!(
            attempting = batch.len(),
            store = self.store.label(),
            "Fetching snapshots into store"
        );

        for name in batch {
            match self.fetch_one(name).await {
                FetchOutcome::Stored { key } => {
                    report.stored += 1;
                    report.stored_keys.push(key);
                    if report.stored % PROGRESS_EVERY == 0 {
                        tracing::info!(
                            stored = report.stored,
                            of = report.attempted,
                            "Upload progress"
                        );
                    }
                }
                FetchOutcome::Skipped { reason } => {
                    tracing::warn!(name = %name, reason = %reason, "Skipping snapshot");
                    report.skipped.push(SkippedItem {
                        name: name.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            stored = report.stored,
            skipped = report.skipped.len(),
            "Batch fetch finished"
        );
        report
    }

    /// Fetch one candidate and stream it into the store.
    pub async fn fetch_one(&self, name: &str) -> FetchOutcome {
        let url = self.resolve_url(name);
        let key = object_key(self.key_prefix, name);

        let response = match self.client.get_stream(&url).await {
            Ok(r) => r,
            Err(e) => {
                return FetchOutcome::Skipped {
                    reason: SkipReason::Network(e.to_string()),
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::Skipped {
                reason: SkipReason::Status(status.as_u16()),
            };
        }

        match self.store.put_stream(&key, response.bytes_stream()).await {
            Ok(bytes) => {
                tracing::debug!(key = %key, bytes, "Stored snapshot");
                FetchOutcome::Stored {
                    key: key.to_string(),
                }
            }
            Err(e) => FetchOutcome::Skipped { reason: e.into() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PREFIX: &str = "raw/day=20231101";

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_url() {
        let client = HttpClient::new("ua", 1_000).unwrap();
        let store = ContentStore::in_memory();
        let fetcher = BatchFetcher::new(&client, &store, "http://src/2023/11/01/", PREFIX);

        assert_eq!(
            fetcher.resolve_url("000000Z.json.gz"),
            "http://src/2023/11/01/000000Z.json.gz"
        );
        assert_eq!(
            fetcher.resolve_url("https://mirror/x/000000Z.json.gz"),
            "https://mirror/x/000000Z.json.gz"
        );
    }

    #[tokio::test]
    async fn test_attempts_min_of_limit_and_len_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{}".to_vec()))
            .mount(&server)
            .await;

        let client = HttpClient::new("ua", 5_000).unwrap();
        let store = ContentStore::in_memory();
        let base = format!("{}/day/", server.uri());
        let fetcher = BatchFetcher::new(&client, &store, &base, PREFIX);
        let list = names(&["a.json.gz", "b.json.gz", "c.json.gz"]);

        let report = fetcher.fetch(&list, 2).await;
        assert_eq!(report.attempted, 2);
        assert_eq!(
            report.stored_keys,
            vec!["raw/day=20231101/a.json.gz", "raw/day=20231101/b.json.gz"]
        );

        let report = fetcher.fetch(&list, 10).await;
        assert_eq!(report.attempted, 3);
        assert_eq!(report.stored, 3);

        let report = fetcher.fetch(&list, 0).await;
        assert_eq!(report.attempted, 0);
        assert_eq!(report.stored, 0);

        let requested: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(
            requested,
            vec![
                "/day/a.json.gz",
                "/day/b.json.gz",
                "/day/a.json.gz",
                "/day/b.json.gz",
                "/day/c.json.gz",
            ]
        );
    }

    #[tokio::test]
    async fn test_failures_are_skipped_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/day/ok.json.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/day/gone.json.gz"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new("ua", 5_000).unwrap();
        let store = ContentStore::in_memory();
        let base = format!("{}/day/", server.uri());
        let fetcher = BatchFetcher::new(&client, &store, &base, PREFIX);
        // Port 9 on localhost is not listening; the request fails at transport level.
        let list = names(&[
            "gone.json.gz",
            "http://127.0.0.1:9/unreachable.json.gz",
            "ok.json.gz",
        ]);

        let report = fetcher.fetch(&list, 10).await;
        assert_eq!(report.attempted, 3);
        assert_eq!(report.stored, 1);
        assert_eq!(report.stored_keys, vec!["raw/day=20231101/ok.json.gz"]);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].reason, SkipReason::Status(404));
        assert!(matches!(report.skipped[1].reason, SkipReason::Network(_)));
    }

    #[tokio::test]
    async fn test_store_write_failure_is_skipped_and_batch_continues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{}".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("objects");
        // A directory where the first object should land makes its commit fail.
        std::fs::create_dir_all(root.join(PREFIX).join("a.json.gz")).unwrap();
        let store = ContentStore::local(&root).unwrap();

        let client = HttpClient::new("ua", 5_000).unwrap();
        let base = format!("{}/day/", server.uri());
        let fetcher = BatchFetcher::new(&client, &store, &base, PREFIX);

        let report = fetcher.fetch(&names(&["a.json.gz", "b.json.gz"]), 10).await;
        assert_eq!(report.attempted, 2);
        assert_eq!(report.stored, 1);
        assert_eq!(report.stored_keys, vec!["raw/day=20231101/b.json.gz"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "a.json.gz");
        assert!(matches!(report.skipped[0].reason, SkipReason::Store(_)));
    }
}
