use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::{EnqueueError, EnqueueOutcome};
use crate::domain::{InterviewScore, InterviewSession, Recommendation, SessionId, TranscriptSegment};
use crate::presentation::state::AppState;

use super::error::error_response;

#[derive(Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub status: &'static str,
    pub recommendation: Option<Recommendation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&InterviewSession> for SessionSummary {
    fn from(session: &InterviewSession) -> Self {
        Self {
            id: session.id.to_string(),
            candidate_name: session.candidate_name.clone(),
            candidate_email: session.candidate_email.clone(),
            status: session.status.as_str(),
            recommendation: session.score.as_ref().map(|s| s.overall.recommendation),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub summary: SessionSummary,
    /// Time-limited playback URL; absent when there is no recording.
    pub video_url: Option<String>,
    pub transcript: Option<String>,
    pub segments: Option<Vec<TranscriptSegment>>,
    pub score: Option<InterviewScore>,
}

#[derive(Serialize)]
pub struct RetryResponse {
    pub session_id: String,
    pub outcome: &'static str,
}

#[tracing::instrument(skip(state))]
pub async fn list_interviews_handler(State(state): State<AppState>) -> Response {
    match state.session_repository.list().await {
        Ok(sessions) => {
            let summaries: Vec<SessionSummary> = sessions.iter().map(SessionSummary::from).collect();
            Json(summaries).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list sessions");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list interviews")
        }
    }
}

#[tracing::instrument(skip(state), fields(session_id = %session_id))]
pub async fn get_interview_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session = match state
        .session_repository
        .get_by_id(&SessionId::from_raw(session_id))
        .await
    {
        Ok(Some(session)) => session,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load session");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load interview");
        }
    };

    let video_url = match &session.recording {
        Some(path) => match state
            .blob_store
            .signed_read_url(path, state.recording_url_ttl)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, path = %path, "Failed to sign recording url");
                None
            }
        },
        None => None,
    };

    Json(SessionDetail {
        summary: SessionSummary::from(&session),
        video_url,
        transcript: session.transcript,
        segments: session.segments,
        score: session.score,
    })
    .into_response()
}

#[tracing::instrument(skip(state), fields(session_id = %session_id))]
pub async fn retry_interview_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = SessionId::from_raw(session_id);
    match state.session_repository.get_by_id(&session_id).await {
        Ok(Some(session)) if session.recording.is_some() => {}
        Ok(Some(_)) => {
            return error_response(StatusCode::CONFLICT, "Interview has no recording to process");
        }
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load session");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load interview");
        }
    }

    let outcome = match state.processing_queue.enqueue(session_id.clone()) {
        Ok(EnqueueOutcome::Queued) => "queued",
        Ok(EnqueueOutcome::AlreadyInFlight) => "already_in_flight",
        Err(e @ (EnqueueError::QueueFull | EnqueueError::Closed)) => {
            return error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string());
        }
    };
    tracing::info!(outcome, "Processing retry requested");

    (
        StatusCode::ACCEPTED,
        Json(RetryResponse {
            session_id: session_id.to_string(),
            outcome,
        }),
    )
        .into_response()
}
