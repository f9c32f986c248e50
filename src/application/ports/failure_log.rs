use async_trait::async_trait;

use crate::domain::SessionId;

/// Append-only record of processing failures.
#[async_trait]
pub trait FailureLog: Send + Sync {
    async fn record(&self, session_id: &SessionId, detail: &str) -> std::io::Result<()>;
}
