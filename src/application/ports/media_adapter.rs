use std::path::Path;

use async_trait::async_trait;

use crate::domain::PcmAudio;

/// Turns recorded containers into 16 kHz mono PCM.
#[async_trait]
pub trait MediaAdapter: Send + Sync {
    /// Demuxes `source` into a 16 kHz mono WAV file at `target`.
    async fn extract_audio(&self, source: &Path, target: &Path) -> Result<(), MediaError>;

    /// Reads a WAV file produced by `extract_audio`.
    async fn load_pcm(&self, path: &Path) -> Result<PcmAudio, MediaError>;

    /// Normalizes an in-memory clip (e.g. a short webm reply).
    async fn normalize(&self, data: &[u8]) -> Result<PcmAudio, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("codec exited with status {code:?}: {stderr}")]
    CodecExited { code: Option<i32>, stderr: String },
    #[error("codec unavailable: {0}")]
    CodecUnavailable(String),
    #[error("decoding failed: {0}")]
    DecodingFailed(String),
    #[error("output too small: {0} bytes")]
    OutputTooSmall(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
