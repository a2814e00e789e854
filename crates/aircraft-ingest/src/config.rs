//! Configuration loading and resolution.
//!
//! [`IngestConfig`] is built once at process start and handed to every run.
//! Nothing here is global; tests construct their own values.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::types::{IngestError, IngestResult};

pub const DEFAULT_SOURCE_URL: &str = "https://samples.adsbexchange.com/readsb-hist";
pub const DEFAULT_BUCKET: &str = "bdi-aircraft";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Which content store backs the raw prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Amazon S3 (credentials and region from the standard `AWS_*` variables).
    S3 { bucket: String },
    /// A directory on the local filesystem, one file per key.
    Local { root: PathBuf },
}

/// Process-wide settings for acquisition and staging.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Root of the remote source, without the day path.
    pub source_url: String,
    /// Day whose snapshots are acquired.
    pub target_day: NaiveDate,
    pub store: StoreBackend,
    /// Root for local staging output.
    pub local_dir: PathBuf,
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            target_day: default_target_day(),
            store: StoreBackend::S3 {
                bucket: DEFAULT_BUCKET.to_string(),
            },
            local_dir: PathBuf::from("data"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl IngestConfig {
    /// Resolve configuration from `BDI_*` environment variables over defaults.
    pub fn from_env() -> IngestResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> IngestResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("BDI_SOURCE_URL") {
            config.source_url = url;
        }

        if let Some(day) = lookup("BDI_TARGET_DAY") {
            config.target_day = NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
                .map_err(|e| IngestError::Config(format!("BDI_TARGET_DAY '{day}': {e}")))?;
        }

        let bucket = lookup("BDI_S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        config.store = match lookup("BDI_STORE")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("s3") => StoreBackend::S3 { bucket },
            Some("local") => StoreBackend::Local {
                root: lookup("BDI_LOCAL_STORE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data/store")),
            },
            Some(other) => {
                return Err(IngestError::Config(format!(
                    "BDI_STORE must be 's3' or 'local', got '{other}'"
                )))
            }
        };

        if let Some(dir) = lookup("BDI_LOCAL_DIR") {
            config.local_dir = PathBuf::from(dir);
        }

        if let Some(ua) = lookup("BDI_USER_AGENT") {
            config.user_agent = ua;
        }

        if let Some(ms) = lookup("BDI_HTTP_TIMEOUT_MS") {
            config.timeout_ms = ms
                .trim()
                .parse()
                .map_err(|e| IngestError::Config(format!("BDI_HTTP_TIMEOUT_MS '{ms}': {e}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> IngestResult<()> {
        if !(self.source_url.starts_with("http://") || self.source_url.starts_with("https://")) {
            return Err(IngestError::Config(format!(
                "source URL must be http(s): '{}'",
                self.source_url
            )));
        }
        if let StoreBackend::S3 { bucket } = &self.store {
            if bucket.trim().is_empty() {
                return Err(IngestError::Config("S3 bucket name is empty".into()));
            }
        }
        if self.timeout_ms == 0 {
            return Err(IngestError::Config("HTTP timeout must be positive".into()));
        }
        Ok(())
    }

    /// Directory-listing page for the target day, e.g. `<source>/2023/11/01/`.
    ///
    /// Always ends with `/`, so relative names can be appended directly.
    pub fn listing_url(&self) -> String {
        format!(
            "{}/{}/",
            self.source_url.trim_end_matches('/'),
            self.target_day.format("%Y/%m/%d")
        )
    }

    /// Day-partition segment, e.g. `day=20231101`.
    pub fn day_partition(&self) -> String {
        format!("day={}", self.target_day.format("%Y%m%d"))
    }

    /// Storage prefix for raw snapshots, e.g. `raw/day=20231101`.
    pub fn raw_prefix(&self) -> String {
        format!("raw/{}", self.day_partition())
    }

    /// Local staging directory, e.g. `data/prepared/day=20231101`.
    pub fn prepared_dir(&self) -> PathBuf {
        self.local_dir.join("prepared").join(self.day_partition())
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_local_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.local_dir = dir.as_ref().to_path_buf();
        self
    }
}

fn default_target_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 11, 1).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_fixed_day() {
        let config = IngestConfig::default();
        assert_eq!(
            config.listing_url(),
            "https://samples.adsbexchange.com/readsb-hist/2023/11/01/"
        );
        assert_eq!(config.raw_prefix(), "raw/day=20231101");
        assert_eq!(
            config.prepared_dir(),
            PathBuf::from("data/prepared/day=20231101")
        );
    }

    #[test]
    fn listing_url_trims_trailing_slash() {
        let config = IngestConfig::default().with_source_url("http://localhost:9000/");
        assert_eq!(config.listing_url(), "http://localhost:9000/2023/11/01/");
    }

    #[test]
    fn env_overrides_apply() {
        let config = IngestConfig::from_lookup(lookup_from(&[
            ("BDI_SOURCE_URL", "http://mirror.local/hist"),
            ("BDI_TARGET_DAY", "2024-02-29"),
            ("BDI_S3_BUCKET", "my-bucket"),
            ("BDI_HTTP_TIMEOUT_MS", "5000"),
        ]))
        .unwrap();

        assert_eq!(config.listing_url(), "http://mirror.local/hist/2024/02/29/");
        assert_eq!(config.raw_prefix(), "raw/day=20240229");
        assert_eq!(
            config.store,
            StoreBackend::S3 {
                bucket: "my-bucket".into()
            }
        );
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn local_backend_uses_store_dir() {
        let config = IngestConfig::from_lookup(lookup_from(&[
            ("BDI_STORE", "Local"),
            ("BDI_LOCAL_STORE_DIR", "/tmp/objects"),
        ]))
        .unwrap();
        assert_eq!(
            config.store,
            StoreBackend::Local {
                root: PathBuf::from("/tmp/objects")
            }
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(IngestConfig::from_lookup(lookup_from(&[("BDI_TARGET_DAY", "11/01/2023")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("BDI_STORE", "gcs")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("BDI_SOURCE_URL", "ftp://x")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("BDI_S3_BUCKET", " ")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("BDI_HTTP_TIMEOUT_MS", "0")])).is_err());
    }
}
