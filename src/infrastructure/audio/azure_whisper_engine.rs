use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{Transcription, TranscriptionEngine, TranscriptionError};
use crate::domain::PcmAudio;

use super::wav_encoder::encode_wav;

/// Whisper hosted as an Azure OpenAI deployment.
pub struct AzureWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AzureWhisperEngine {
    pub fn new(base_url: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        let endpoint = format!(
            "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct AzureTranscriptionResponse {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl TranscriptionEngine for AzureWhisperEngine {
    async fn transcribe(&self, audio: &PcmAudio) -> Result<Transcription, TranscriptionError> {
        if audio.is_empty() {
            return Ok(Transcription::Unintelligible);
        }

        let wav = encode_wav(audio).map_err(|e| TranscriptionError::EncodingFailed(e.to_string()))?;
        let file_part = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::EncodingFailed(format!("mime: {}", e)))?;
        let form = multipart::Form::new().part("file", file_part);

        tracing::debug!(
            duration_secs = audio.duration_secs(),
            "Sending audio to Azure OpenAI Whisper"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let result: AzureTranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(format!("parse response: {}", e)))?;

        Ok(Transcription::from_text(result.text))
    }
}
