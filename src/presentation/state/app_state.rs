use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{BlobStore, SessionRepository, SpeechSynthesizer};
use crate::application::services::{AnswerIntentRouter, AvatarRenderer, ProcessingQueue};
use crate::domain::InterviewScript;

#[derive(Clone)]
pub struct AppState {
    pub intent_router: Arc<AnswerIntentRouter>,
    pub session_repository: Arc<dyn SessionRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    pub processing_queue: ProcessingQueue,
    pub avatar_renderer: Arc<AvatarRenderer>,
    pub speech_synthesizer: Arc<dyn SpeechSynthesizer>,
    pub interview_script: Arc<InterviewScript>,
    /// Validity of recording playback URLs handed to recruiters.
    pub recording_url_ttl: Duration,
}
