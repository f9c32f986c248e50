mod avatar_cache_store;
mod blob_store;
mod failure_log;
mod llm_client;
mod media_adapter;
mod render_job_api;
mod repository_error;
mod session_repository;
mod speech_synthesizer;
mod transcription_engine;

pub use avatar_cache_store::{AvatarCacheMap, AvatarCacheStore, CacheStoreError};
pub use blob_store::{BlobStore, BlobStoreError};
pub use failure_log::FailureLog;
pub use llm_client::{LlmClient, LlmClientError, decode_completion};
pub use media_adapter::{MediaAdapter, MediaError};
pub use render_job_api::{RenderApiError, RenderJobApi};
pub use repository_error::RepositoryError;
pub use session_repository::SessionRepository;
pub use speech_synthesizer::{SpeechSynthesizer, SynthesisError};
pub use transcription_engine::{Transcription, TranscriptionEngine, TranscriptionError};
