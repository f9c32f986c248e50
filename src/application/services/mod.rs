mod avatar_cache;
mod avatar_renderer;
mod intent_router;
mod processing_queue;
mod rubric;
mod session_processor;

pub use avatar_cache::AvatarCache;
pub use avatar_renderer::{
    AvatarError, AvatarRenderer, PreGenerateReport, PreGenerateStatus, RenderPolicy,
};
pub use intent_router::{
    AnswerIntentRouter, FALLBACK_MIN_WORDS, MAX_PROMPTS_PER_QUESTION, MIN_ANSWER_WORDS,
    classify_explicit_phrasing, count_words, fallback_decision, word_count_gate,
};
pub use processing_queue::{
    EnqueueError, EnqueueOutcome, ProcessingQueue, SessionJobHandler,
};
pub use rubric::{intent_system_prompt, scoring_system_prompt, scoring_user_prompt};
pub use session_processor::{ProcessingError, ProcessingPolicy, SessionProcessor};
