use std::fmt;

use super::{CacheKey, SessionId};

const RECORDING_FILENAME: &str = "full_interview.webm";
const AVATAR_AUDIO_PREFIX: &str = "avatar_audio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// Location of a session's full-length recording.
    pub fn recording(session_id: &SessionId) -> Self {
        Self(format!("{}/{}", session_id.as_str(), RECORDING_FILENAME))
    }

    /// Location of synthesized speech handed to the render service.
    pub fn avatar_audio(cache_key: Option<&CacheKey>) -> Self {
        let label = cache_key.map(CacheKey::as_str).unwrap_or("temp");
        Self(format!("{}/avatar_{}.mp3", AVATAR_AUDIO_PREFIX, label))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
