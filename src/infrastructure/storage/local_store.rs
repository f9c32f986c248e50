use std::io;
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::domain::StoragePath;

use super::object_io;

/// Blob store rooted in a local directory. Signed URLs are plain `file://`
/// URLs, so the TTL is not enforced.
pub struct LocalBlobStore {
    inner: LocalFileSystem,
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(base_path: PathBuf) -> Result<Self, BlobStoreError> {
        std::fs::create_dir_all(&base_path)?;
        let root = std::fs::canonicalize(&base_path)?;
        let inner = LocalFileSystem::new_with_prefix(&root)
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;
        Ok(Self { inner, root })
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
        _content_length: Option<u64>,
    ) -> Result<u64, BlobStoreError> {
        object_io::put_stream(&self.inner, path, stream).await
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, BlobStoreError> {
        object_io::get_bytes(&self.inner, path).await
    }

    async fn signed_read_url(
        &self,
        path: &StoragePath,
        _ttl: Duration,
    ) -> Result<String, BlobStoreError> {
        let file = self.root.join(path.as_str());
        if !tokio::fs::try_exists(&file).await? {
            return Err(BlobStoreError::NotFound(path.to_string()));
        }
        Ok(format!("file://{}", file.display()))
    }
}
