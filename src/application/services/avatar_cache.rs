use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::ports::{AvatarCacheMap, AvatarCacheStore, CacheStoreError};
use crate::domain::{AvatarClip, CacheKey, CachedClip};

/// In-memory view of the avatar cache, written through to its store.
///
/// Every insert rewrites the whole document while holding the write lock,
/// so concurrent renders cannot interleave partial flushes.
pub struct AvatarCache {
    entries: RwLock<AvatarCacheMap>,
    store: Arc<dyn AvatarCacheStore>,
}

impl AvatarCache {
    pub async fn load(store: Arc<dyn AvatarCacheStore>) -> Result<Self, CacheStoreError> {
        let entries = store.load().await?;
        tracing::info!(entries = entries.len(), "Avatar cache loaded");
        Ok(Self {
            entries: RwLock::new(entries),
            store,
        })
    }

    pub fn empty(store: Arc<dyn AvatarCacheStore>) -> Self {
        Self {
            entries: RwLock::new(AvatarCacheMap::new()),
            store,
        }
    }

    /// A usable clip for `key`. Error records count as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<AvatarClip> {
        self.entries
            .read()
            .await
            .get(key)
            .and_then(CachedClip::as_ready)
            .cloned()
    }

    /// Records `clip` and flushes. The in-memory entry is kept even when the
    /// flush fails.
    pub async fn insert(&self, key: CacheKey, clip: AvatarClip) -> Result<(), CacheStoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(key, CachedClip::from(clip));
        self.store.save(&entries).await
    }

    pub async fn clear(&self) -> Result<(), CacheStoreError> {
        let mut entries = self.entries.write().await;
        entries.clear();
        self.store.clear().await
    }
}
