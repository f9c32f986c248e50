use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::{AvatarCacheMap, AvatarCacheStore, CacheStoreError};

/// The avatar cache as a pretty-printed JSON object on disk.
pub struct JsonFileCacheStore {
    path: PathBuf,
}

impl JsonFileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where an unreadable document is moved: `{file}.corrupt`.
    pub fn quarantine_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".corrupt");
        PathBuf::from(name)
    }
}

#[async_trait]
impl AvatarCacheStore for JsonFileCacheStore {
    async fn load(&self) -> Result<AvatarCacheMap, CacheStoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AvatarCacheMap::new()),
            Err(e) => return Err(CacheStoreError::Io(e)),
        };
        match serde_json::from_slice(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // Moved aside so the next save cannot overwrite clips still in the file.
                let quarantine = self.quarantine_path();
                tokio::fs::rename(&self.path, &quarantine).await?;
                tracing::warn!(
                    error = %e,
                    moved_to = %quarantine.display(),
                    "Unreadable avatar cache document moved aside"
                );
                Err(CacheStoreError::Malformed(e.to_string()))
            }
        }
    }

    /// Writes a sibling temp file and renames it over the document.
    async fn save(&self, entries: &AvatarCacheMap) -> Result<(), CacheStoreError> {
        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| CacheStoreError::Malformed(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        tracing::debug!(entries = entries.len(), path = %self.path.display(), "Avatar cache saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheStoreError::Io(e)),
        }
    }
}
