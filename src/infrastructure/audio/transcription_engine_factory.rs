use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{OpenAiFlavor, TranscriptionSettings};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &TranscriptionSettings,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match settings.provider {
            OpenAiFlavor::OpenAi => Ok(Arc::new(OpenAiWhisperEngine::new(
                settings.api_key.clone(),
                settings.base_url.clone(),
                Some(settings.model.clone()),
            ))),
            OpenAiFlavor::Azure => {
                let endpoint = settings.base_url.as_deref().ok_or_else(|| {
                    TranscriptionError::ApiRequestFailed(
                        "transcription.base_url required for Azure".to_string(),
                    )
                })?;
                let deployment = settings
                    .azure_deployment
                    .as_deref()
                    .unwrap_or(&settings.model);
                Ok(Arc::new(AzureWhisperEngine::new(
                    endpoint,
                    deployment,
                    &settings.api_key,
                    &settings.azure_api_version,
                )))
            }
        }
    }
}
