//! Core data types for acquisition runs and their outcomes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where a run's candidate names came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Scraped,
    Generated,
}

/// Candidate names for one run, tagged with how they were obtained.
///
/// Resolved before truncation so callers can tell whether the listing page
/// produced links or the deterministic enumeration was used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    /// Links found on the remote listing page, in document order.
    Scraped(Vec<String>),
    /// The full deterministic enumeration for the target day.
    Generated(Vec<String>),
}

impl Candidates {
    pub fn source(&self) -> CandidateSource {
        match self {
            Candidates::Scraped(_) => CandidateSource::Scraped,
            Candidates::Generated(_) => CandidateSource::Generated,
        }
    }

    pub fn names(&self) -> &[String] {
        match self {
            Candidates::Scraped(names) | Candidates::Generated(names) => names,
        }
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

/// Why a single candidate was not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The remote source answered with a non-success status.
    Status(u16),
    /// The request or the body transfer failed at the transport level.
    Network(String),
    /// The content store rejected the write.
    Store(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Status(code) => write!(f, "HTTP {code}"),
            SkipReason::Network(msg) => write!(f, "network error: {msg}"),
            SkipReason::Store(msg) => write!(f, "store error: {msg}"),
        }
    }
}

/// Result of fetching one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    Stored { key: String },
    Skipped { reason: SkipReason },
}

/// A candidate that was attempted but not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub name: String,
    pub reason: SkipReason,
}

/// Aggregate counts for one batch fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub attempted: usize,
    pub stored: usize,
    pub stored_keys: Vec<String>,
    pub skipped: Vec<SkippedItem>,
}

/// Summary of one acquisition run, returned once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub source: CandidateSource,
    /// Candidates considered before truncation.
    pub total: usize,
    /// `min(total, limit)`.
    pub attempted: usize,
    pub stored: usize,
    pub stored_keys: Vec<String>,
    pub skipped: Vec<SkippedItem>,
}

impl RunSummary {
    pub fn from_batch(source: CandidateSource, total: usize, batch: BatchReport) -> Self {
        Self {
            source,
            total,
            attempted: batch.attempted,
            stored: batch.stored,
            stored_keys: batch.stored_keys,
            skipped: batch.skipped,
        }
    }
}

/// Summary of one staging pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareSummary {
    /// Objects listed under the raw prefix.
    pub listed: usize,
    /// Objects written into the staging directory.
    pub copied: usize,
    pub destination: PathBuf,
}

/// Errors that can occur in the acquisition library.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to retrieve listing page {url}: {source}")]
    ListingPage {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Store error: {0}")]
    Store(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type IngestResult<T> = Result<T, IngestError>;
