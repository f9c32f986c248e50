use async_trait::async_trait;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns encoded audio (MP3) for `text`.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("empty text")]
    EmptyText,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("empty audio returned")]
    EmptyAudio,
}
