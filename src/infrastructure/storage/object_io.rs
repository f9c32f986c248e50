use std::io;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::BlobStoreError;
use crate::domain::StoragePath;

pub(super) fn store_path(path: &StoragePath) -> StorePath {
    StorePath::from(path.as_str())
}

/// Streams `stream` into a multipart upload, aborting it on any failure.
pub(super) async fn put_stream(
    store: &dyn ObjectStore,
    path: &StoragePath,
    mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
) -> Result<u64, BlobStoreError> {
    let mut upload = store
        .put_multipart(&store_path(path))
        .await
        .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(b) => b,
            Err(e) => {
                let _ = upload.abort().await;
                return Err(BlobStoreError::Io(e));
            }
        };
        total_bytes += bytes.len() as u64;
        if let Err(e) = upload.put_part(PutPayload::from(bytes)).await {
            let _ = upload.abort().await;
            return Err(BlobStoreError::UploadFailed(e.to_string()));
        }
    }

    upload
        .complete()
        .await
        .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

    tracing::debug!(path = %path, bytes = total_bytes, "Blob stored");
    Ok(total_bytes)
}

pub(super) async fn get_bytes(
    store: &dyn ObjectStore,
    path: &StoragePath,
) -> Result<Vec<u8>, BlobStoreError> {
    let result = store.get(&store_path(path)).await.map_err(|e| match e {
        object_store::Error::NotFound { .. } => BlobStoreError::NotFound(path.to_string()),
        other => BlobStoreError::DownloadFailed(other.to_string()),
    })?;

    let bytes = result
        .bytes()
        .await
        .map_err(|e| BlobStoreError::DownloadFailed(e.to_string()))?;
    Ok(bytes.to_vec())
}
