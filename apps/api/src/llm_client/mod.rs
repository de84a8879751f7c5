/// LLM Client — the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// All LLM interactions go through a `ChatBackend`, normally a `ChatModel`.
///
/// Building a `ChatModel` is lazy: no request is made until `complete` is called,
/// so a bad key or unreachable endpoint only shows up on first use.
use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Low temperature keeps completions close to deterministic for field extraction.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_FREQUENCY_PENALTY: f32 = 0.1;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// API credential. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

impl From<String> for SecretString {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl From<&str> for SecretString {
    fn from(secret: &str) -> Self {
        Self(secret.to_string())
    }
}

/// Immutable model configuration. The defaults are the values used by
/// `connect_llm_model`; callers may override any of them before building a handle.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model: String,
    pub api_key: SecretString,
    pub temperature: f32,
    pub frequency_penalty: f32,
    pub base_url: String,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            temperature: DEFAULT_TEMPERATURE,
            frequency_penalty: DEFAULT_FREQUENCY_PENALTY,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Clamped to [0, 1].
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    pub fn with_frequency_penalty(mut self, frequency_penalty: f32) -> Self {
        self.frequency_penalty = frequency_penalty;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Seam between callers and the completion API, so tests and the app state
/// can hold a mock instead of a live `ChatModel`.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one system + user exchange and returns the assistant text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    frequency_penalty: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Configured chat-completion handle.
#[derive(Clone)]
pub struct ChatModel {
    client: Client,
    config: ModelConfig,
}

/// Builds a handle with the default model, temperature and frequency penalty.
/// Startup calls this and layers any configured overrides with `reconfigure`.
pub fn connect_llm_model(api_key: impl Into<SecretString>) -> ChatModel {
    ChatModel::new(ModelConfig::new(api_key))
}

impl ChatModel {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Replaces the configuration, starting from the current one. Still lazy.
    pub fn reconfigure(mut self, f: impl FnOnce(ModelConfig) -> ModelConfig) -> Self {
        self.config = f(self.config);
        self
    }

    /// Makes a single call to the chat-completions endpoint. No retries.
    pub async fn call(&self, system: &str, prompt: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            frequency_penalty: self.config.frequency_penalty,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(self.config.api_key.expose())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl ChatBackend for ChatModel {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(system, prompt).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
