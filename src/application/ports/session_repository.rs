use async_trait::async_trait;

use crate::domain::{InterviewSession, SessionId};

use super::RepositoryError;

/// Key-value view of session records. Writes replace the whole record.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn get_by_id(&self, id: &SessionId) -> Result<Option<InterviewSession>, RepositoryError>;

    async fn put(&self, session: &InterviewSession) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<InterviewSession>, RepositoryError>;
}
