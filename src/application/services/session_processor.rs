use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use crate::application::ports::{
    BlobStore, BlobStoreError, FailureLog, LlmClient, LlmClientError, MediaAdapter, MediaError,
    RepositoryError, SessionRepository, Transcription, TranscriptionEngine, decode_completion,
};
use crate::domain::{
    InterviewScore, InterviewSession, InvalidTransition, PcmAudio, ScoreValidationError, SessionId, SessionStatus,
    StoragePath, TranscriptSegment,
};

use super::rubric::{scoring_system_prompt, scoring_user_prompt};

/// Thresholds and scratch space for a processing run.
#[derive(Debug, Clone)]
pub struct ProcessingPolicy {
    /// Recordings smaller than this are treated as a failed upload.
    pub min_recording_bytes: u64,
    /// Extracted audio must exceed this when the codec reports an error.
    pub min_audio_bytes: u64,
    pub transcription_window: Duration,
    /// Transcripts shorter than this are not sent for scoring.
    pub min_transcript_chars: usize,
    /// Parent directory for per-run scratch space; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ProcessingPolicy {
    fn default() -> Self {
        Self {
            min_recording_bytes: 1000,
            min_audio_bytes: 1000,
            transcription_window: Duration::from_secs(30),
            min_transcript_chars: 5,
            scratch_dir: None,
        }
    }
}

struct PipelineOutput {
    transcript: String,
    segments: Vec<TranscriptSegment>,
    score: Option<InterviewScore>,
}

/// Turns an uploaded recording into a transcript and a score, driving the
/// session through `processing` to `completed` or `failed`.
pub struct SessionProcessor {
    session_repository: Arc<dyn SessionRepository>,
    blob_store: Arc<dyn BlobStore>,
    media: Arc<dyn MediaAdapter>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    llm_client: Arc<dyn LlmClient>,
    failure_log: Arc<dyn FailureLog>,
    questions: Vec<String>,
    policy: ProcessingPolicy,
}

impl SessionProcessor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        blob_store: Arc<dyn BlobStore>,
        media: Arc<dyn MediaAdapter>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        llm_client: Arc<dyn LlmClient>,
        failure_log: Arc<dyn FailureLog>,
        questions: Vec<String>,
        policy: ProcessingPolicy,
    ) -> Self {
        Self {
            session_repository,
            blob_store,
            media,
            transcription_engine,
            llm_client,
            failure_log,
            questions,
            policy,
        }
    }

    /// Processes one session. Safe to call again for a session that already
    /// completed or failed.
    ///
    /// Pipeline failures are written to the failure log and leave the
    /// session `failed`; the error is still returned so the dispatcher can
    /// log it.
    pub async fn process(&self, session_id: &SessionId) -> Result<(), ProcessingError> {
        let Some(mut session) = self.session_repository.get_by_id(session_id).await? else {
            tracing::warn!("Session not found, nothing to process");
            return Ok(());
        };
        let Some(recording) = session.recording.clone() else {
            tracing::info!(status = %session.status, "Session has no recording yet, skipping");
            return Ok(());
        };

        session.transition_to(SessionStatus::Processing)?;
        self.session_repository.put(&session).await?;
        tracing::debug!(status = %session.status, "Session status transition");

        let outcome = match self.run_pipeline(&recording).await {
            Ok(output) => self.persist_completed(&session, output).await,
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            let detail = format!("{}\n{:#?}", e, e);
            if let Err(log_err) = self.failure_log.record(session_id, &detail).await {
                tracing::warn!(error = %log_err, "Failed to write failure log entry");
            }
            session.transition_to(SessionStatus::Failed)?;
            if let Err(put_err) = self.session_repository.put(&session).await {
                tracing::error!(error = %put_err, "Failed to persist failed session status");
            }
            tracing::error!(error = %e, "Session processing failed");
            return Err(e);
        }
        Ok(())
    }

    /// Writes the completed record. `session` stays `processing` when this
    /// fails so the caller can still mark it failed.
    async fn persist_completed(
        &self,
        session: &InterviewSession,
        output: PipelineOutput,
    ) -> Result<(), ProcessingError> {
        let scored = output.score.is_some();
        let transcript_chars = output.transcript.len();

        let mut completed = session.clone();
        completed.complete(output.transcript, output.segments, output.score)?;
        self.session_repository.put(&completed).await?;

        tracing::info!(scored, transcript_chars, "Session processing completed");
        Ok(())
    }

    async fn run_pipeline(&self, recording: &StoragePath) -> Result<PipelineOutput, ProcessingError> {
        // Removed on drop, whichever way this function returns.
        let scratch = self.scratch_dir().await?;
        let video_path = scratch.path().join("recording.webm");
        let audio_path = scratch.path().join("recording.wav");

        let data = self
            .blob_store
            .fetch(recording)
            .await
            .map_err(ProcessingError::Download)?;
        let size = data.len() as u64;
        tracing::debug!(bytes = size, path = %recording, "Recording downloaded");

        if size < self.policy.min_recording_bytes {
            return Err(ProcessingError::RecordingTooSmall {
                size,
                minimum: self.policy.min_recording_bytes,
            });
        }

        tokio::fs::write(&video_path, &data).await?;
        drop(data);

        self.extract_audio(&video_path, &audio_path).await?;
        let pcm = self
            .media
            .load_pcm(&audio_path)
            .await
            .map_err(ProcessingError::AudioExtraction)?;
        tracing::debug!(duration_secs = pcm.duration_secs(), "Audio extracted");

        let segments = self.transcribe_windows(&pcm).await;
        let transcript = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let score = if transcript.chars().count() < self.policy.min_transcript_chars {
            tracing::info!(chars = transcript.len(), "Transcript too short, skipping scoring");
            None
        } else {
            Some(self.score(&transcript).await?)
        };

        Ok(PipelineOutput {
            transcript,
            segments,
            score,
        })
    }

    async fn scratch_dir(&self) -> Result<TempDir, ProcessingError> {
        let builder = {
            let mut b = tempfile::Builder::new();
            b.prefix("session-");
            b
        };
        let dir = match &self.policy.scratch_dir {
            Some(parent) => {
                tokio::fs::create_dir_all(parent).await?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    /// Some encoders report a premature end while still writing usable
    /// audio, so a codec error is fatal only when the output is too small.
    async fn extract_audio(&self, source: &Path, target: &Path) -> Result<(), ProcessingError> {
        match self.media.extract_audio(source, target).await {
            Ok(()) => Ok(()),
            Err(MediaError::CodecExited { code, stderr }) => {
                let produced = tokio::fs::metadata(target)
                    .await
                    .map(|m| m.len())
                    .unwrap_or(0);
                if produced > self.policy.min_audio_bytes {
                    tracing::warn!(
                        code = ?code,
                        bytes = produced,
                        "Codec reported an error but produced usable audio, continuing"
                    );
                    Ok(())
                } else {
                    Err(ProcessingError::AudioExtraction(MediaError::CodecExited {
                        code,
                        stderr,
                    }))
                }
            }
            Err(e) => Err(ProcessingError::AudioExtraction(e)),
        }
    }

    async fn transcribe_windows(&self, pcm: &PcmAudio) -> Vec<TranscriptSegment> {
        let windows = pcm.windows(self.policy.transcription_window);
        let total = windows.len();
        let mut segments = Vec::with_capacity(total);

        for window in windows {
            match self.transcription_engine.transcribe(&window.audio).await {
                Ok(Transcription::Text(text)) => {
                    segments.push(TranscriptSegment::new(text, window.start_secs, window.end_secs));
                }
                Ok(Transcription::Unintelligible) => {
                    segments.push(TranscriptSegment::silence(window.start_secs, window.end_secs));
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        window = window.index,
                        total,
                        "Window transcription failed, skipping"
                    );
                }
            }
        }

        segments
    }

    async fn score(&self, transcript: &str) -> Result<InterviewScore, ProcessingError> {
        let system_prompt = scoring_system_prompt(&self.questions);
        let value = self
            .llm_client
            .complete_json(&system_prompt, &scoring_user_prompt(transcript))
            .await
            .map_err(ProcessingError::Scoring)?;

        let score: InterviewScore = decode_completion(value).map_err(ProcessingError::Scoring)?;
        score
            .validate(self.questions.len())
            .map_err(ProcessingError::InvalidScore)?;

        tracing::info!(recommendation = ?score.overall.recommendation, "Scoring complete");
        Ok(score)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("status: {0}")]
    Transition(#[from] InvalidTransition),
    #[error("recording download: {0}")]
    Download(BlobStoreError),
    #[error("recording too small: {size} bytes (minimum {minimum}), upload likely failed")]
    RecordingTooSmall { size: u64, minimum: u64 },
    #[error("audio extraction: {0}")]
    AudioExtraction(MediaError),
    #[error("scoring: {0}")]
    Scoring(LlmClientError),
    #[error("invalid score: {0}")]
    InvalidScore(ScoreValidationError),
    #[error("scratch io: {0}")]
    Io(#[from] std::io::Error),
}
