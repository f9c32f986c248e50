mod avatar_clip;
mod cache_key;
mod expression;
mod intent_action;
mod intent_decision;
mod interview_score;
mod interview_script;
mod interview_session;
mod pcm_audio;
mod render_job;
mod session_id;
mod session_status;
mod storage_path;
mod transcript_segment;

pub use avatar_clip::{AvatarClip, CachedClip};
pub use cache_key::CacheKey;
pub use expression::Expression;
pub use intent_action::IntentAction;
pub use intent_decision::IntentDecision;
pub use interview_score::{
    InterviewScore, MAX_RUBRIC_SCORE, MIN_RUBRIC_SCORE, OverallAssessment, QuestionScore,
    Recommendation, ScoreValidationError,
};
pub use interview_script::{AvatarScript, InterviewScript};
pub use interview_session::{InterviewSession, InvalidTransition};
pub use pcm_audio::{AudioWindow, PcmAudio, TARGET_SAMPLE_RATE};
pub use render_job::{RenderJob, RenderJobStatus};
pub use session_id::SessionId;
pub use session_status::SessionStatus;
pub use storage_path::StoragePath;
pub use transcript_segment::{SILENCE_MARKER, TranscriptSegment};
