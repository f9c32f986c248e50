use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;

use crate::application::ports::{
    BlobStore, BlobStoreError, CacheStoreError, RenderApiError, RenderJobApi, SpeechSynthesizer,
    SynthesisError,
};
use crate::domain::{
    AvatarClip, AvatarScript, CacheKey, Expression, RenderJob, RenderJobStatus, StoragePath,
};

use super::avatar_cache::AvatarCache;

#[derive(Debug, Clone)]
pub struct RenderPolicy {
    pub poll_interval: Duration,
    /// Total time a render job may stay unfinished.
    pub max_wait: Duration,
    /// Validity of the signed URL handed to the render service.
    pub audio_url_ttl: Duration,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(120),
            audio_url_ttl: Duration::from_secs(3600),
        }
    }
}

/// Result of pre-generating one script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PreGenerateStatus {
    Cached(AvatarClip),
    Generated(AvatarClip),
    Failed { error: String },
}

pub type PreGenerateReport = BTreeMap<CacheKey, PreGenerateStatus>;

/// Text in, talking-head clip out: speech synthesis, audio upload, a remote
/// render job, and a keyed cache in front of all of it.
pub struct AvatarRenderer {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    blob_store: Arc<dyn BlobStore>,
    render_api: Arc<dyn RenderJobApi>,
    cache: Arc<AvatarCache>,
    policy: RenderPolicy,
}

impl AvatarRenderer {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        blob_store: Arc<dyn BlobStore>,
        render_api: Arc<dyn RenderJobApi>,
        cache: Arc<AvatarCache>,
        policy: RenderPolicy,
    ) -> Self {
        Self {
            synthesizer,
            blob_store,
            render_api,
            cache,
            policy,
        }
    }

    /// Returns the clip for `text`, rendering it unless `cache_key` already
    /// has a usable entry.
    #[tracing::instrument(skip(self, text), fields(cache_key = ?cache_key.map(CacheKey::as_str), chars = text.len()))]
    pub async fn render(
        &self,
        text: &str,
        cache_key: Option<&CacheKey>,
        expression: Expression,
    ) -> Result<AvatarClip, AvatarError> {
        if let Some(key) = cache_key {
            if let Some(clip) = self.cache.get(key).await {
                tracing::debug!("Avatar cache hit");
                return Ok(clip);
            }
        }

        let audio = self
            .synthesizer
            .synthesize(text)
            .await
            .map_err(AvatarError::Synthesis)?;
        tracing::debug!(bytes = audio.len(), "Speech synthesized");

        let audio_url = self.upload_audio(cache_key, audio).await?;

        let job_id = self
            .render_api
            .create_job(&audio_url, expression)
            .await
            .map_err(|e| match e {
                RenderApiError::Rejected(body) => AvatarError::JobRejected(body),
                other => AvatarError::JobCreation(other),
            })?;
        tracing::info!(job_id = %job_id, expression = %expression, "Render job created");

        let job = self.wait_for_job(&job_id).await?;
        let video_url = job
            .result_url
            .ok_or_else(|| AvatarError::MissingResult(job_id.clone()))?;
        let clip = AvatarClip {
            video_url,
            duration: job.duration.unwrap_or(0.0),
            talk_id: job_id,
        };

        if let Some(key) = cache_key {
            if let Err(e) = self.cache.insert(key.clone(), clip.clone()).await {
                tracing::error!(error = %e, "Failed to persist avatar cache");
            }
        }

        tracing::info!(talk_id = %clip.talk_id, duration = clip.duration, "Avatar clip ready");
        Ok(clip)
    }

    async fn upload_audio(
        &self,
        cache_key: Option<&CacheKey>,
        audio: Vec<u8>,
    ) -> Result<String, AvatarError> {
        let path = StoragePath::avatar_audio(cache_key);
        let length = audio.len() as u64;
        let stream = futures::stream::once(async move { Ok(Bytes::from(audio)) }).boxed();

        self.blob_store
            .store(&path, stream, Some(length))
            .await
            .map_err(AvatarError::Upload)?;

        self.blob_store
            .signed_read_url(&path, self.policy.audio_url_ttl)
            .await
            .map_err(AvatarError::Upload)
    }

    /// Polls until the job settles. Transport failures are retried; the
    /// overall deadline still applies.
    async fn wait_for_job(&self, job_id: &str) -> Result<RenderJob, AvatarError> {
        let poll = async {
            loop {
                match self.render_api.job_status(job_id).await {
                    Ok(job) => match job.status {
                        RenderJobStatus::Done => return Ok(job),
                        RenderJobStatus::Error => {
                            return Err(AvatarError::RenderFailed(
                                job.error.unwrap_or_else(|| "Unknown error".to_string()),
                            ));
                        }
                        RenderJobStatus::Pending => {
                            tracing::debug!(job_id, "Render job still running");
                        }
                    },
                    Err(RenderApiError::ApiRequestFailed(e)) => {
                        tracing::warn!(job_id, error = %e, "Render status poll failed, retrying");
                    }
                    Err(e) => return Err(AvatarError::JobStatus(e)),
                }
                tokio::time::sleep(self.policy.poll_interval).await;
            }
        };

        tokio::time::timeout(self.policy.max_wait, poll)
            .await
            .map_err(|_| AvatarError::Timeout {
                job_id: job_id.to_string(),
                waited: self.policy.max_wait,
            })?
    }

    /// Renders every script that has no usable cache entry, one at a time.
    /// A failure is recorded against its key and does not stop the rest.
    pub async fn pre_generate(&self, scripts: &[AvatarScript]) -> PreGenerateReport {
        let mut report = PreGenerateReport::new();

        for script in scripts {
            if let Some(clip) = self.cache.get(&script.key).await {
                report.insert(script.key.clone(), PreGenerateStatus::Cached(clip));
                continue;
            }

            let status = match self
                .render(&script.text, Some(&script.key), script.expression)
                .await
            {
                Ok(clip) => PreGenerateStatus::Generated(clip),
                Err(e) => {
                    tracing::error!(key = %script.key, error = %e, "Pre-generation failed");
                    PreGenerateStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.insert(script.key.clone(), status);
        }

        tracing::info!(
            total = report.len(),
            failed = report
                .values()
                .filter(|s| matches!(s, PreGenerateStatus::Failed { .. }))
                .count(),
            "Avatar pre-generation finished"
        );
        report
    }

    pub async fn cached(&self, key: &CacheKey) -> Option<AvatarClip> {
        self.cache.get(key).await
    }

    pub async fn clear_cache(&self) -> Result<(), CacheStoreError> {
        self.cache.clear().await?;
        tracing::info!("Avatar cache cleared");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("speech synthesis: {0}")]
    Synthesis(SynthesisError),
    #[error("audio upload: {0}")]
    Upload(BlobStoreError),
    #[error("render job creation: {0}")]
    JobCreation(RenderApiError),
    /// The render service refused the job; carries its response body.
    #[error("render job rejected: {0}")]
    JobRejected(String),
    #[error("render job status: {0}")]
    JobStatus(RenderApiError),
    #[error("render failed: {0}")]
    RenderFailed(String),
    #[error("render job {job_id} unfinished after {waited:?}")]
    Timeout { job_id: String, waited: Duration },
    #[error("render job {0} finished without a result url")]
    MissingResult(String),
}
