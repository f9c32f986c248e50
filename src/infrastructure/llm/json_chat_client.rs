use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::{LlmSettings, OpenAiFlavor};

/// Chat completions in JSON mode against OpenAI or an Azure OpenAI deployment.
pub struct JsonChatClient {
    client: Client,
    flavor: OpenAiFlavor,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl JsonChatClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmClientError> {
        let endpoint = match settings.provider {
            OpenAiFlavor::OpenAi => format!(
                "{}/chat/completions",
                settings
                    .base_url
                    .as_deref()
                    .unwrap_or("https://api.openai.com/v1")
                    .trim_end_matches('/')
            ),
            OpenAiFlavor::Azure => {
                let base = settings.base_url.as_deref().ok_or_else(|| {
                    LlmClientError::InvalidResponse(
                        "llm.base_url required for azure provider".to_string(),
                    )
                })?;
                format!(
                    "{}/openai/deployments/{}/chat/completions?api-version={}",
                    base.trim_end_matches('/'),
                    settings.azure_deployment.as_deref().unwrap_or(&settings.model),
                    settings.azure_api_version
                )
            }
        };

        Ok(Self {
            client: Client::new(),
            flavor: settings.provider,
            endpoint,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.flavor {
            OpenAiFlavor::Azure => request.header("api-key", &self.api_key),
            OpenAiFlavor::OpenAi => request.bearer_auth(&self.api_key),
        }
    }
}

#[async_trait]
impl LlmClient for JsonChatClient {
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value, LlmClientError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::debug!(
            model = %self.model,
            prompt = %sanitize_prompt(user_prompt),
            "Requesting JSON completion"
        );

        let response = self
            .apply_auth(self.client.post(&self.endpoint).json(&body))
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))?;

        serde_json::from_str(&content).map_err(|e| {
            LlmClientError::InvalidResponse(format!(
                "completion is not JSON ({}): {}",
                e,
                sanitize_prompt(&content)
            ))
        })
    }
}
