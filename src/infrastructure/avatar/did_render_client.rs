use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::{RenderApiError, RenderJobApi};
use crate::domain::{Expression, RenderJob, RenderJobStatus};
use crate::presentation::config::AvatarSettings;

/// D-ID Talks API: a presenter image lip-synced to an audio URL.
pub struct DidRenderClient {
    client: Client,
    base_url: String,
    api_key: String,
    presenter_url: String,
}

#[derive(Serialize)]
struct CreateTalkRequest<'a> {
    source_url: &'a str,
    script: TalkScript<'a>,
    config: TalkConfig,
}

#[derive(Serialize)]
struct TalkScript<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    audio_url: &'a str,
}

#[derive(Serialize)]
struct TalkConfig {
    stitch: bool,
    fluent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    driver_expressions: Option<DriverExpressions>,
}

#[derive(Serialize)]
struct DriverExpressions {
    expressions: Vec<ExpressionFrame>,
}

#[derive(Serialize)]
struct ExpressionFrame {
    expression: Expression,
    start_frame: u32,
}

#[derive(Deserialize)]
struct CreateTalkResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Deserialize)]
struct TalkStatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result_url: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    /// A string or a structured object depending on the failure.
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl DidRenderClient {
    pub fn new(settings: &AvatarSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            presenter_url: settings.presenter_url.clone(),
        }
    }

    fn create_request<'a>(&'a self, audio_url: &'a str, expression: Expression) -> CreateTalkRequest<'a> {
        let driver_expressions = (expression != Expression::Neutral).then(|| DriverExpressions {
            expressions: vec![ExpressionFrame {
                expression,
                start_frame: 0,
            }],
        });

        CreateTalkRequest {
            source_url: &self.presenter_url,
            script: TalkScript {
                kind: "audio",
                audio_url,
            },
            config: TalkConfig {
                stitch: true,
                fluent: true,
                driver_expressions,
            },
        }
    }
}

fn describe_error(error: serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl RenderJobApi for DidRenderClient {
    async fn create_job(
        &self,
        audio_url: &str,
        expression: Expression,
    ) -> Result<String, RenderApiError> {
        let response = self
            .client
            .post(format!("{}/talks", self.base_url))
            .header("Authorization", format!("Basic {}", self.api_key))
            .json(&self.create_request(audio_url, expression))
            .send()
            .await
            .map_err(|e| RenderApiError::ApiRequestFailed(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Render job creation rejected");
            return Err(RenderApiError::Rejected(body));
        }

        let created: CreateTalkResponse = response
            .json()
            .await
            .map_err(|e| RenderApiError::InvalidResponse(e.to_string()))?;

        created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RenderApiError::InvalidResponse("no talk id returned".to_string()))
    }

    async fn job_status(&self, job_id: &str) -> Result<RenderJob, RenderApiError> {
        let response = self
            .client
            .get(format!("{}/talks/{}", self.base_url, job_id))
            .header("Authorization", format!("Basic {}", self.api_key))
            .send()
            .await
            .map_err(|e| RenderApiError::ApiRequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(RenderApiError::ApiRequestFailed(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderApiError::Rejected(body));
        }

        let talk: TalkStatusResponse = response
            .json()
            .await
            .map_err(|e| RenderApiError::InvalidResponse(e.to_string()))?;

        let remote_status = talk.status.as_deref().unwrap_or("unknown");
        tracing::debug!(job_id, status = remote_status, "Render job polled");

        Ok(RenderJob {
            id: job_id.to_string(),
            status: RenderJobStatus::from_remote(remote_status),
            result_url: talk.result_url,
            duration: talk.duration,
            error: talk.error.map(describe_error),
        })
    }
}
