use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Chat completion in JSON mode: the reply is parsed before it leaves the
/// adapter.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Decodes a JSON completion into a typed value.
pub fn decode_completion<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, LlmClientError> {
    serde_json::from_value(value).map_err(|e| LlmClientError::InvalidResponse(e.to_string()))
}
