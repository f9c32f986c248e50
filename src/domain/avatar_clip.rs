use serde::{Deserialize, Serialize};

/// A finished talking-head clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarClip {
    pub video_url: String,
    pub duration: f64,
    pub talk_id: String,
}

/// One value of the persisted avatar cache document.
///
/// Entries are either a finished clip or an `{"error": ...}` record left by
/// an earlier failed render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CachedClip {
    Ready(AvatarClip),
    Failed { error: String },
}

impl CachedClip {
    pub fn as_ready(&self) -> Option<&AvatarClip> {
        match self {
            CachedClip::Ready(clip) => Some(clip),
            CachedClip::Failed { .. } => None,
        }
    }
}

impl From<AvatarClip> for CachedClip {
    fn from(clip: AvatarClip) -> Self {
        CachedClip::Ready(clip)
    }
}
