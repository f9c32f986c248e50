use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::application::ports::SynthesisError;
use crate::application::services::AvatarError;
use crate::domain::{CacheKey, Expression};
use crate::presentation::state::AppState;

use super::error::error_response;

#[derive(Debug, Deserialize)]
pub struct RenderAvatarRequest {
    pub text: String,
    #[serde(default)]
    pub cache_key: Option<String>,
    #[serde(default)]
    pub expression: Expression,
}

fn avatar_error_status(error: &AvatarError) -> StatusCode {
    match error {
        AvatarError::Synthesis(SynthesisError::EmptyText) => StatusCode::BAD_REQUEST,
        AvatarError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        AvatarError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

#[tracing::instrument(skip(state, request), fields(cache_key = ?request.cache_key))]
pub async fn render_avatar_handler(
    State(state): State<AppState>,
    Json(request): Json<RenderAvatarRequest>,
) -> Response {
    let cache_key = request.cache_key.filter(|k| !k.is_empty()).map(CacheKey::new);

    match state
        .avatar_renderer
        .render(&request.text, cache_key.as_ref(), request.expression)
        .await
    {
        Ok(clip) => Json(clip).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Avatar render failed");
            error_response(avatar_error_status(&e), e.to_string())
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn pregenerate_avatars_handler(State(state): State<AppState>) -> Response {
    let scripts = state.interview_script.avatar_scripts();
    let report = state.avatar_renderer.pre_generate(&scripts).await;
    Json(report).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn cached_clip_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Response {
    match state.avatar_renderer.cached(&CacheKey::new(key)).await {
        Some(clip) => Json(clip).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No cached clip for key"),
    }
}

#[tracing::instrument(skip(state))]
pub async fn clear_avatar_cache_handler(State(state): State<AppState>) -> Response {
    match state.avatar_renderer.clear_cache().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to clear avatar cache");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
