use async_trait::async_trait;

use crate::domain::{Expression, RenderJob};

/// Remote service turning an audio URL into a lip-synced video.
#[async_trait]
pub trait RenderJobApi: Send + Sync {
    async fn create_job(
        &self,
        audio_url: &str,
        expression: Expression,
    ) -> Result<String, RenderApiError>;

    async fn job_status(&self, job_id: &str) -> Result<RenderJob, RenderApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderApiError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    /// Non-success status; carries the remote body unchanged.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
