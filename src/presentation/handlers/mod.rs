mod avatar;
mod error;
mod health;
mod interview;
mod recruiter;

pub use avatar::{
    cached_clip_handler, clear_avatar_cache_handler, pregenerate_avatars_handler,
    render_avatar_handler,
};
pub use error::ErrorResponse;
pub use health::health_handler;
pub use interview::{
    analyze_answer_handler, complete_interview_handler, script_audio_handler,
    start_interview_handler, synthesize_handler,
};
pub use recruiter::{get_interview_handler, list_interviews_handler, retry_interview_handler};
