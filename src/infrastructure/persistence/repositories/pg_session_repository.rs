use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;
use tracing::instrument;

use crate::application::ports::{RepositoryError, SessionRepository};
use crate::domain::{
    InterviewScore, InterviewSession, SessionId, SessionStatus, StoragePath, TranscriptSegment,
};

const SELECT_COLUMNS: &str = "SELECT id, candidate_name, candidate_email, status, recording_path, \
     transcript, score, segments, created_at, updated_at FROM interview_sessions";

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

fn session_from_row(row: &PgRow) -> Result<InterviewSession, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_failed)?;
    let corrupt = |reason: String| RepositoryError::CorruptRecord {
        id: id.clone(),
        reason,
    };

    let status = row
        .try_get::<String, _>("status")
        .map_err(query_failed)?
        .parse::<SessionStatus>()
        .map_err(corrupt)?;
    let score: Option<Json<InterviewScore>> = row
        .try_get("score")
        .map_err(|e| corrupt(format!("score: {}", e)))?;
    let segments: Option<Json<Vec<TranscriptSegment>>> = row
        .try_get("segments")
        .map_err(|e| corrupt(format!("segments: {}", e)))?;

    Ok(InterviewSession {
        id: SessionId::from_raw(id.clone()),
        candidate_name: row.try_get("candidate_name").map_err(query_failed)?,
        candidate_email: row.try_get("candidate_email").map_err(query_failed)?,
        status,
        recording: row
            .try_get::<Option<String>, _>("recording_path")
            .map_err(query_failed)?
            .map(StoragePath::from_raw),
        transcript: row.try_get("transcript").map_err(query_failed)?,
        score: score.map(|Json(s)| s),
        segments: segments.map(|Json(s)| s),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(query_failed)?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(query_failed)?,
    })
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self), fields(session_id = %id))]
    async fn get_by_id(&self, id: &SessionId) -> Result<Option<InterviewSession>, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed)?;

        row.as_ref().map(session_from_row).transpose()
    }

    #[instrument(skip(self, session), fields(session_id = %session.id, status = %session.status))]
    async fn put(&self, session: &InterviewSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO interview_sessions
                (id, candidate_name, candidate_email, status, recording_path,
                 transcript, score, segments, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                candidate_name = EXCLUDED.candidate_name,
                candidate_email = EXCLUDED.candidate_email,
                status = EXCLUDED.status,
                recording_path = EXCLUDED.recording_path,
                transcript = EXCLUDED.transcript,
                score = EXCLUDED.score,
                segments = EXCLUDED.segments,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session.id.as_str())
        .bind(&session.candidate_name)
        .bind(&session.candidate_email)
        .bind(session.status.as_str())
        .bind(session.recording.as_ref().map(StoragePath::as_str))
        .bind(session.transcript.as_deref())
        .bind(session.score.as_ref().map(Json))
        .bind(session.segments.as_ref().map(Json))
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<InterviewSession>, RepositoryError> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at DESC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed)?;

        rows.iter().map(session_from_row).collect()
    }
}
