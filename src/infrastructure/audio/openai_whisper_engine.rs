use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{Transcription, TranscriptionEngine, TranscriptionError};
use crate::domain::PcmAudio;

use super::wav_encoder::encode_wav;

pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(&self, audio: &PcmAudio) -> Result<Transcription, TranscriptionError> {
        if audio.is_empty() {
            return Ok(Transcription::Unintelligible);
        }

        let wav = encode_wav(audio).map_err(|e| TranscriptionError::EncodingFailed(e.to_string()))?;
        let file_part = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::EncodingFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(
            model = %self.model,
            duration_secs = audio.duration_secs(),
            "Sending audio to OpenAI Whisper API"
        );

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
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

        let text = response
            .text()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(format!("body: {}", e)))?;

        let transcription = Transcription::from_text(text);
        tracing::debug!(
            intelligible = matches!(transcription, Transcription::Text(_)),
            "OpenAI Whisper transcription completed"
        );
        Ok(transcription)
    }
}
