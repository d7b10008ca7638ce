//! Client for an OpenAI-compatible chat-completion API.

use std::time::Duration;

use async_trait::async_trait;

use super::errors::{AssistantError, AssistantResult};
use super::types::{CompletionRequest, CompletionResponse};
use crate::config::LlmConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything that can turn a prompt into a completion
///
/// The server talks to [`OpenAiClient`]; tests substitute scripted replies.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> AssistantResult<CompletionResponse>;
}

/// HTTP client for `POST {base_url}/chat/completions`
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> AssistantResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Reuses an existing [`reqwest::Client`] and its connection pool
    pub fn with_client(client: reqwest::Client, config: &LlmConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Turns a non-2xx response into [`AssistantError::Api`] carrying the body
    async fn ensure_success(response: reqwest::Response) -> AssistantResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> AssistantResult<CompletionResponse> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Requesting chat completion"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<CompletionResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".into(),
            base_url: base_url.into(),
            model: "gpt-3.5-turbo".into(),
            temperature: 0.7,
        }
    }

    #[test]
    fn completions_url_joins_cleanly() {
        let client = OpenAiClient::new(&config("https://api.example.com/v1/")).unwrap();
        assert_eq!(
            client.completions_url(),
            "https://api.example.com/v1/chat/completions"
        );
    }
}
