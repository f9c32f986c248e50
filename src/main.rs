use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use interview_engine::application::ports::{
    AvatarCacheStore, CacheStoreError, FailureLog, LlmClient, MediaAdapter, RenderJobApi,
    SpeechSynthesizer,
};
use interview_engine::application::services::{
    AnswerIntentRouter, AvatarCache, AvatarRenderer, ProcessingQueue, SessionProcessor,
};
use interview_engine::infrastructure::audio::{FfmpegMediaAdapter, TranscriptionEngineFactory};
use interview_engine::infrastructure::avatar::{DidRenderClient, JsonFileCacheStore};
use interview_engine::infrastructure::diagnostics::FileFailureLog;
use interview_engine::infrastructure::llm::JsonChatClient;
use interview_engine::infrastructure::observability::init_tracing;
use interview_engine::infrastructure::persistence::SessionRepositoryFactory;
use interview_engine::infrastructure::speech::ElevenLabsSynthesizer;
use interview_engine::infrastructure::storage::BlobStoreFactory;
use interview_engine::presentation::{AppState, Environment, Settings, create_router};

const RECORDING_URL_TTL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&settings.tracing_config(environment));

    let media = Arc::new(FfmpegMediaAdapter::new(&settings.processing.ffmpeg_path));
    if let Err(e) = media.check_available().await {
        tracing::warn!(error = %e, "ffmpeg unavailable; answer analysis and processing will fail");
    }
    let media: Arc<dyn MediaAdapter> = media;

    let transcription_engine = TranscriptionEngineFactory::create(&settings.transcription)
        .context("Failed to create transcription engine")?;
    let llm_client: Arc<dyn LlmClient> =
        Arc::new(JsonChatClient::new(&settings.llm).context("Failed to create LLM client")?);
    let blob_store =
        BlobStoreFactory::create(&settings.storage).context("Failed to create blob store")?;
    let session_repository = SessionRepositoryFactory::create(&settings.database)
        .await
        .context("Failed to create session repository")?;
    let failure_log: Arc<dyn FailureLog> =
        Arc::new(FileFailureLog::new(&settings.processing.failure_log_path));

    let intent_router = Arc::new(AnswerIntentRouter::new(
        Arc::clone(&media),
        Arc::clone(&transcription_engine),
        Arc::clone(&llm_client),
    ));

    let processor = Arc::new(SessionProcessor::new(
        Arc::clone(&session_repository),
        Arc::clone(&blob_store),
        Arc::clone(&media),
        Arc::clone(&transcription_engine),
        Arc::clone(&llm_client),
        failure_log,
        settings.interview.questions.clone(),
        settings.processing.policy(),
    ));
    let (processing_queue, _workers) = ProcessingQueue::start(
        processor,
        settings.processing.workers,
        settings.processing.queue_capacity,
    );

    let cache_store: Arc<dyn AvatarCacheStore> =
        Arc::new(JsonFileCacheStore::new(&settings.avatar.cache_path));
    let avatar_cache = match AvatarCache::load(Arc::clone(&cache_store)).await {
        Ok(cache) => cache,
        Err(e @ CacheStoreError::Malformed(_)) => {
            tracing::warn!(error = %e, "Avatar cache unreadable, starting empty");
            AvatarCache::empty(cache_store)
        }
        Err(e) => return Err(e).context("Failed to load avatar cache"),
    };
    let synthesizer: Arc<dyn SpeechSynthesizer> =
        Arc::new(ElevenLabsSynthesizer::new(&settings.speech));
    let render_api: Arc<dyn RenderJobApi> = Arc::new(DidRenderClient::new(&settings.avatar));
    let avatar_renderer = Arc::new(AvatarRenderer::new(
        Arc::clone(&synthesizer),
        Arc::clone(&blob_store),
        render_api,
        Arc::new(avatar_cache),
        settings.avatar.render_policy(),
    ));

    let state = AppState {
        intent_router,
        session_repository,
        blob_store,
        processing_queue,
        avatar_renderer,
        speech_synthesizer: synthesizer,
        interview_script: Arc::new(settings.interview.clone()),
        recording_url_ttl: RECORDING_URL_TTL,
    };

    let router = create_router(state, settings.server.max_upload_mb * 1024 * 1024);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
