//! aircraft-ingest: acquire one day of aircraft-tracking snapshots into object
//! storage and stage them locally.
//!
//! The acquisition path is: fetch the day's listing page, extract snapshot
//! links, fall back to the deterministic filename enumeration when the page
//! has none, then fetch the first `file_limit` candidates one by one into the
//! content store.

pub mod acquire;
pub mod config;
pub mod extract;
pub mod fallback;
pub mod fetcher;
pub mod http_client;
pub mod prepare;
pub mod store;
pub mod types;

pub use acquire::{clamp_limit, resolve_candidates, Acquirer, DEFAULT_FILE_LIMIT};
pub use config::{IngestConfig, StoreBackend};
pub use extract::extract_candidates;
pub use fallback::generate_day_candidates;
pub use fetcher::BatchFetcher;
pub use http_client::HttpClient;
pub use prepare::{prepare, stage_prefix};
pub use store::{object_key, ContentStore};
pub use types::*;
