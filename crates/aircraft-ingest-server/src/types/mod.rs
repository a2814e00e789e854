//! Request and error types for the HTTP surface.

pub mod error;

pub use error::{ApiError, ApiResult};

/// Body returned by the trigger endpoints on completion.
pub const STATUS_OK: &str = "OK";

/// Query parameters for the download trigger.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DownloadParams {
    /// Upper bound on snapshots to acquire; non-positive values fetch nothing.
    #[serde(default = "default_file_limit")]
    pub file_limit: i64,
}

fn default_file_limit() -> i64 {
    aircraft_ingest::DEFAULT_FILE_LIMIT
}
