use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::constants::USER_AGENT;

/// One prompt for the text generation provider
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw model output. The text is not guaranteed to be JSON.
    async fn complete(&self, request: &TextRequest) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

pub struct OpenAiCompatibleClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatibleClient {
    pub fn new(config: &GenerationConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    async fn complete(&self, request: &TextRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(model = %self.model, "Requesting chat completion");

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("chat completion request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Request failed with status: {} - {}", status, text);
        }

        let data = response.json::<ChatCompletionResponse>().await?;
        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}
