use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    analyze_answer_handler, cached_clip_handler, clear_avatar_cache_handler,
    complete_interview_handler, get_interview_handler, health_handler, list_interviews_handler,
    pregenerate_avatars_handler, render_avatar_handler, retry_interview_handler,
    script_audio_handler, start_interview_handler, synthesize_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let interview = Router::new()
        .route("/start", post(start_interview_handler))
        .route("/analyze", post(analyze_answer_handler))
        .route("/audio/{key}", get(script_audio_handler))
        .route("/synthesize", post(synthesize_handler))
        .route("/{session_id}/complete", post(complete_interview_handler));

    let recruiter = Router::new()
        .route("/interviews", get(list_interviews_handler))
        .route("/interviews/{session_id}", get(get_interview_handler))
        .route("/interviews/{session_id}/retry", post(retry_interview_handler));

    let avatar = Router::new()
        .route("/render", post(render_avatar_handler))
        .route("/pregenerate", post(pregenerate_avatars_handler))
        .route("/cache", delete(clear_avatar_cache_handler))
        .route("/cache/{key}", get(cached_clip_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/interview", interview)
        .nest("/api/recruiter", recruiter)
        .nest("/api/avatar", avatar)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
