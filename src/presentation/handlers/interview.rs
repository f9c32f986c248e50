use std::io;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::application::ports::SynthesisError;
use crate::application::services::{EnqueueError, EnqueueOutcome};
use crate::domain::{IntentDecision, InterviewSession, SessionId, SessionStatus, StoragePath};
use crate::presentation::state::AppState;

use super::error::error_response;

#[derive(Debug, Default, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct StartInterviewResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct CompleteInterviewResponse {
    pub session_id: String,
    pub status: &'static str,
    pub bytes: u64,
    pub queued: bool,
}

#[tracing::instrument(skip(state, request))]
pub async fn start_interview_handler(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Response {
    let session = InterviewSession::new(request.name, request.email);

    if let Err(e) = state.session_repository.put(&session).await {
        tracing::error!(error = %e, "Failed to create session");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session");
    }

    tracing::info!(session_id = %session.id, "Interview session started");
    (
        StatusCode::CREATED,
        Json(StartInterviewResponse {
            session_id: session.id.to_string(),
            status: session.status.as_str(),
        }),
    )
        .into_response()
}

/// Always answers with a decision; malformed forms move the interview on.
#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_answer_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Json<IntentDecision> {
    let mut audio: Option<Bytes> = None;
    let mut question_text = String::new();
    let mut attempt: u32 = 0;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read analyze form");
                return Json(IntentDecision::advance("Form Parse Error", ""));
            }
        };

        match field.name().unwrap_or_default() {
            "file" => match field.bytes().await {
                Ok(bytes) => audio = Some(bytes),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read answer audio");
                    return Json(IntentDecision::advance("Form Parse Error", ""));
                }
            },
            "question_text" => question_text = field.text().await.unwrap_or_default(),
            "attempt" => {
                attempt = field
                    .text()
                    .await
                    .ok()
                    .and_then(|t| t.trim().parse().ok())
                    .unwrap_or(0);
            }
            _ => {}
        }
    }

    let Some(audio) = audio.filter(|a| !a.is_empty()) else {
        tracing::info!("No answer audio received, advancing");
        return Json(IntentDecision::advance("No Audio File", ""));
    };

    Json(
        state
            .intent_router
            .decide(&audio, &question_text, attempt)
            .await,
    )
}

#[tracing::instrument(skip(state, multipart), fields(session_id = %session_id))]
pub async fn complete_interview_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let session_id = SessionId::from_raw(session_id);
    let mut session = match state.session_repository.get_by_id(&session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Interview not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load session");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load session");
        }
    };

    // Refused before any byte is written so an accepted recording is never replaced.
    if !session.status.can_transition_to(SessionStatus::Uploaded) {
        tracing::warn!(status = %session.status, "Recording upload refused for session state");
        return error_response(
            StatusCode::CONFLICT,
            format!("Interview is {}, recording cannot be replaced", session.status),
        );
    }

    let path = StoragePath::recording(&session_id);
    let mut stored: Option<u64> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let stream = field
            .map_err(io::Error::other)
            .boxed();
        match state.blob_store.store(&path, stream, None).await {
            Ok(bytes) => stored = Some(bytes),
            Err(e) => {
                tracing::error!(error = %e, "Recording upload failed");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Upload failed: {}", e),
                );
            }
        }
        break;
    }

    let Some(bytes) = stored else {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "No file uploaded");
    };

    if let Err(e) = session.attach_recording(path) {
        tracing::warn!(error = %e, "Recording uploaded for a session in the wrong state");
        return error_response(StatusCode::CONFLICT, e.to_string());
    }
    if let Err(e) = state.session_repository.put(&session).await {
        tracing::error!(error = %e, "Failed to persist uploaded session");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update session");
    }
    tracing::info!(bytes, "Recording uploaded");

    let queued = match state.processing_queue.enqueue(session_id.clone()) {
        Ok(EnqueueOutcome::Queued) => true,
        Ok(EnqueueOutcome::AlreadyInFlight) => false,
        Err(EnqueueError::QueueFull) | Err(EnqueueError::Closed) => {
            tracing::error!("Processing queue unavailable; session left uploaded for retry");
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Recording stored but processing is unavailable, retry later",
            );
        }
    };

    (
        StatusCode::ACCEPTED,
        Json(CompleteInterviewResponse {
            session_id: session_id.to_string(),
            status: "processing",
            bytes,
            queued,
        }),
    )
        .into_response()
}

fn audio_response(audio: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::ACCESS_CONTROL_EXPOSE_HEADERS, "Content-Length, Content-Type"),
        ],
        audio,
    )
        .into_response()
}

fn synthesis_error_response(error: SynthesisError) -> Response {
    tracing::error!(error = %error, "Speech synthesis failed");
    let status = match &error {
        SynthesisError::EmptyText => StatusCode::BAD_REQUEST,
        SynthesisError::ApiRequestFailed(_) | SynthesisError::EmptyAudio => StatusCode::BAD_GATEWAY,
    };
    error_response(status, format!("TTS generation failed: {}", error))
}

/// Spoken audio for one of the interview's scripted prompts.
#[tracing::instrument(skip(state))]
pub async fn script_audio_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Response {
    let Some(text) = state.interview_script.script_text(&key) else {
        return error_response(StatusCode::NOT_FOUND, "Audio not found");
    };

    match state.speech_synthesizer.synthesize(text).await {
        Ok(audio) => {
            tracing::debug!(bytes = audio.len(), "Script audio synthesized");
            audio_response(audio)
        }
        Err(e) => synthesis_error_response(e),
    }
}

/// Spoken audio for ad-hoc conductor lines such as nudges and rephrasings.
#[tracing::instrument(skip(state, request), fields(chars = request.text.len()))]
pub async fn synthesize_handler(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Response {
    if request.text.trim().is_empty() {
        return synthesis_error_response(SynthesisError::EmptyText);
    }

    match state.speech_synthesizer.synthesize(&request.text).await {
        Ok(audio) => audio_response(audio),
        Err(e) => synthesis_error_response(e),
    }
}
