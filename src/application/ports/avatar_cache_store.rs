use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{CacheKey, CachedClip};

pub type AvatarCacheMap = BTreeMap<CacheKey, CachedClip>;

/// Durable home of the avatar cache document.
#[async_trait]
pub trait AvatarCacheStore: Send + Sync {
    /// `Malformed` means the document was unreadable and has been moved out
    /// of the way; saving afterwards starts a fresh document.
    async fn load(&self) -> Result<AvatarCacheMap, CacheStoreError>;

    /// Replaces the stored document with `entries`.
    async fn save(&self, entries: &AvatarCacheMap) -> Result<(), CacheStoreError>;

    async fn clear(&self) -> Result<(), CacheStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed cache document: {0}")]
    Malformed(String),
}
