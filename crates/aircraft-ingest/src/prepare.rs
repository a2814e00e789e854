//! Stage raw snapshots from the store into a local day-partition directory.

use std::path::Path;

use object_store::path::Path as ObjectPath;

use crate::config::IngestConfig;
use crate::store::ContentStore;
use crate::types::{IngestResult, PrepareSummary};

/// Copy every object under `prefix` into `dest_dir`, keeping only filenames.
///
/// `dest_dir` is created if missing and existing files are overwritten. Any
/// list, read or write failure aborts the pass.
pub async fn stage_prefix(
    store: &ContentStore,
    prefix: &str,
    dest_dir: &Path,
) -> IngestResult<PrepareSummary> {
    tokio::fs::create_dir_all(dest_dir).await?;

    let keys = store.list_keys(&ObjectPath::from(prefix)).await?;
    tracing::info!(
        prefix,
        objects = keys.len(),
        dest = %dest_dir.display(),
        "Staging raw snapshots"
    );

    let mut copied = 0usize;
    for key in &keys {
        let Some(filename) = key.filename() else {
            continue;
        };
        let bytes = store.download_to_file(key, &dest_dir.join(filename)).await?;
        tracing::debug!(key = %key, bytes, "Staged snapshot");
        copied += 1;
    }

    tracing::info!(copied, "Staging done");
    Ok(PrepareSummary {
        listed: keys.len(),
        copied,
        destination: dest_dir.to_path_buf(),
    })
}

/// Stage the configured day's raw prefix into its prepared directory.
pub async fn prepare(config: &IngestConfig, store: &ContentStore) -> IngestResult<PrepareSummary> {
    stage_prefix(store, &config.raw_prefix(), &config.prepared_dir()).await
}
