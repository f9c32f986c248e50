use async_trait::async_trait;

use crate::domain::PcmAudio;

/// Outcome of recognizing one stretch of audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Text(String),
    /// The recognizer heard nothing it could turn into words.
    Unintelligible,
}

impl Transcription {
    /// Treats blank recognizer output as unintelligible.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Transcription::Unintelligible
        } else {
            Transcription::Text(trimmed.to_string())
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Transcription::Text(text) => text,
            Transcription::Unintelligible => String::new(),
        }
    }
}

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio: &PcmAudio) -> Result<Transcription, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio encoding failed: {0}")]
    EncodingFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
