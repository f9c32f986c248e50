use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::signer::Signer;

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::domain::StoragePath;

use super::object_io;

/// Azure Blob container; read URLs are shared-key SAS URLs.
pub struct AzureBlobStore {
    inner: MicrosoftAzure,
}

impl AzureBlobStore {
    pub fn new(account: &str, access_key: &str, container: &str) -> Result<Self, BlobStoreError> {
        let inner = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        Ok(Self { inner })
    }
}

#[async_trait::async_trait]
impl BlobStore for AzureBlobStore {
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
        ttl: Duration,
    ) -> Result<String, BlobStoreError> {
        let url = self
            .inner
            .signed_url(reqwest::Method::GET, &object_io::store_path(path), ttl)
            .await
            .map_err(|e| BlobStoreError::SigningFailed(e.to_string()))?;
        Ok(url.to_string())
    }
}
