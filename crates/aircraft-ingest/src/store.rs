//! Content store: streaming uploads and prefix listings over `object_store`.

use std::path::Path;
use std::sync::Arc;

use futures::stream::{Stream, StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};
use tokio::io::AsyncWriteExt;

use crate::config::StoreBackend;
use crate::types::{IngestResult, SkipReason};

/// Part size for multipart uploads; smaller bodies use a single put.
const UPLOAD_PART_SIZE: usize = 10 * 1024 * 1024;

/// Why a streaming upload did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The source body stream failed mid-transfer.
    Body(String),
    /// The store rejected a write or the final commit.
    Store(String),
}

impl From<UploadError> for SkipReason {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Body(msg) => SkipReason::Network(msg),
            UploadError::Store(msg) => SkipReason::Store(msg),
        }
    }
}

/// Handle to the blob store holding raw snapshots.
#[derive(Debug, Clone)]
pub struct ContentStore {
    inner: Arc<dyn ObjectStore>,
    label: String,
}

impl ContentStore {
    pub fn new(inner: Arc<dyn ObjectStore>, label: impl Into<String>) -> Self {
        Self {
            inner,
            label: label.into(),
        }
    }

    /// Open the configured backend.
    pub fn from_backend(backend: &StoreBackend) -> IngestResult<Self> {
        match backend {
            StoreBackend::S3 { bucket } => {
                let s3 = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .build()?;
                Ok(Self::new(Arc::new(s3), format!("s3://{bucket}")))
            }
            StoreBackend::Local { root } => Self::local(root),
        }
    }

    /// A store rooted at a local directory, created if missing.
    pub fn local(root: &Path) -> IngestResult<Self> {
        std::fs::create_dir_all(root)?;
        let fs = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(fs), format!("file://{}", root.display())))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory://")
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Stream a body into `key`, returning the number of bytes written.
    ///
    /// Nothing is visible under `key` unless the whole body was written.
    pub async fn put_stream<S, B, E>(&self, key: &ObjectPath, body: S) -> Result<u64, UploadError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        self.put_stream_in_parts(key, body, UPLOAD_PART_SIZE).await
    }

    /// Bodies shorter than `part_size` are written with a single put; longer
    /// ones go through a multipart upload that is aborted on any failure.
    async fn put_stream_in_parts<S, B, E>(
        &self,
        key: &ObjectPath,
        body: S,
        part_size: usize,
    ) -> Result<u64, UploadError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        futures::pin_mut!(body);
        let mut buffer: Vec<u8> = Vec::with_capacity(part_size.min(64 * 1024));
        let mut upload: Option<Box<dyn MultipartUpload>> = None;
        let mut written = 0u64;

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    abort_upload(key, upload.as_mut()).await;
                    return Err(UploadError::Body(e.to_string()));
                }
            };
            let bytes = chunk.as_ref();
            buffer.extend_from_slice(bytes);
            written += bytes.len() as u64;

            if buffer.len() < part_size {
                continue;
            }
            if upload.is_none() {
                match self.inner.put_multipart(key).await {
                    Ok(u) => upload = Some(u),
                    Err(e) => return Err(UploadError::Store(e.to_string())),
                }
            }
            if let Some(u) = upload.as_mut() {
                let part = PutPayload::from(std::mem::take(&mut buffer));
                if let Err(e) = u.put_part(part).await {
                    abort_upload(key, Some(u)).await;
                    return Err(UploadError::Store(e.to_string()));
                }
            }
        }

        let result = match upload.as_mut() {
            None => self.inner.put(key, PutPayload::from(buffer)).await.map(|_| ()),
            Some(u) => {
                let tail = if buffer.is_empty() {
                    Ok(())
                } else {
                    u.put_part(PutPayload::from(buffer)).await
                };
                match tail {
                    Ok(()) => u.complete().await.map(|_| ()),
                    Err(e) => Err(e),
                }
            }
        };

        if let Err(e) = result {
            abort_upload(key, upload.as_mut()).await;
            return Err(UploadError::Store(e.to_string()));
        }
        Ok(written)
    }

    /// All keys under `prefix`, following the store's pagination to the end.
    pub async fn list_keys(&self, prefix: &ObjectPath) -> IngestResult<Vec<ObjectPath>> {
        let keys: Vec<ObjectPath> = self
            .inner
            .list(Some(prefix))
            .map_ok(|meta| meta.location)
            .try_collect()
            .await?;
        Ok(keys)
    }

    /// Copy one object to a local file, overwriting it. Returns bytes written.
    pub async fn download_to_file(&self, key: &ObjectPath, dest: &Path) -> IngestResult<u64> {
        let mut stream = self.inner.get(key).await?.into_stream();
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    /// Read a whole object into memory.
    pub async fn get_bytes(&self, key: &ObjectPath) -> IngestResult<Vec<u8>> {
        let bytes = self.inner.get(key).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Discard a started multipart upload. Abort failures are only logged.
async fn abort_upload(key: &ObjectPath, upload: Option<&mut Box<dyn MultipartUpload>>) {
    if let Some(u) = upload {
        if let Err(e) = u.abort().await {
            tracing::warn!(key = %key, error = %e, "Failed to abort partial upload");
        }
    }
}

/// Storage key for a candidate: `<prefix>/<final path segment of name>`.
pub fn object_key(prefix: &str, name: &str) -> ObjectPath {
    let filename = name
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(name);
    ObjectPath::from(prefix).child(filename)
}
