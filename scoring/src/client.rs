use crate::config::ModelConfig;
use crate::error::{Result, ScoringError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One chat message in OpenAI wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Anything that can answer a chat completion.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for a local LM Studio server (or any OpenAI-compatible endpoint)
#[derive(Clone)]
pub struct LmStudioClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: Option<String>,
    max_tokens: u32,
}

impl LmStudioClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone().filter(|m| !m.trim().is_empty()),
            max_tokens: config.max_tokens,
        })
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = Some(model.into());
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

#[async_trait]
impl ChatClient for LmStudioClient {
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let model = self.model.as_deref().ok_or(ScoringError::ModelNotSet)?;
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model, messages = messages.len(), "sending chat completion");

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model,
                messages,
                temperature,
                max_tokens: self.max_tokens,
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ScoringError::Http { status, body });
        }

        let body: ChatResponse = resp.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ScoringError::EmptyResponse)
    }
}
