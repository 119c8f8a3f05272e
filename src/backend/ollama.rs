//! Ollama HTTP backend (`/api/chat`, `/api/tags`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{BackendError, ChatBackend, ChatMessage, ChatRequest};
use crate::config::ChatConfig;
use crate::style::SamplingOptions;

/// Timeout for listing installed models.
const TAGS_TIMEOUT: Duration = Duration::from_secs(20);

/// Client for a local Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    chat_url: String,
    base_url: String,
}

#[derive(Serialize)]
struct ApiChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: SamplingOptions,
}

#[derive(Deserialize)]
struct ApiChatResponse {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    content: String,
}

#[derive(Deserialize)]
struct ApiTagsResponse {
    #[serde(default)]
    models: Vec<ApiModel>,
}

#[derive(Deserialize)]
struct ApiModel {
    #[serde(default)]
    name: String,
}

impl OllamaClient {
    pub fn new(config: &ChatConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;
        Ok(Self {
            client,
            chat_url: config.backend.url.clone(),
            base_url: config.backend_base_url(),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Names of installed models. Any failure yields an empty list.
    pub async fn list_models(&self) -> Vec<String> {
        let url = format!("{}/api/tags", self.base_url);
        let response = match self.client.get(&url).timeout(TAGS_TIMEOUT).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(url = %url, status = %response.status(), "model list request failed");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "cannot list models");
                return Vec::new();
            }
        };

        match response.json::<ApiTagsResponse>().await {
            Ok(tags) => tags
                .models
                .into_iter()
                .map(|m| m.name)
                .filter(|name| !name.is_empty())
                .collect(),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "malformed model list");
                Vec::new()
            }
        }
    }
}

impl ChatBackend for OllamaClient {
    async fn chat(&self, request: &ChatRequest) -> Result<String, BackendError> {
        let body = ApiChatRequest {
            model: &request.model,
            messages: &request.messages,
            stream: false,
            options: request.options,
        };

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            temperature = request.options.temperature,
            "sending chat request"
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %self.chat_url, error = %e, "chat request failed");
                BackendError::Unreachable {
                    url: self.chat_url.clone(),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http { status, body });
        }

        let payload: ApiChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(payload.message.content.trim().to_string())
    }
}
