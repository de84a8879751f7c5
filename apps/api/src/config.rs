use anyhow::{ensure, Context, Result};

use crate::llm_client::{
    ModelConfig, DEFAULT_BASE_URL, DEFAULT_FREQUENCY_PENALTY, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

/// Application configuration loaded from environment variables.
/// Startup fails if `OPENAI_API_KEY` is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_temperature: f32,
    pub openai_frequency_penalty: f32,
    pub openai_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openai_api_key = var("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .context("Required environment variable 'OPENAI_API_KEY' is not set")?;

        let openai_temperature = match var("OPENAI_TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .context("OPENAI_TEMPERATURE must be a number")?,
            None => DEFAULT_TEMPERATURE,
        };
        ensure!(
            (0.0..=1.0).contains(&openai_temperature),
            "OPENAI_TEMPERATURE must be between 0 and 1, got {openai_temperature}"
        );

        let openai_frequency_penalty = match var("OPENAI_FREQUENCY_PENALTY") {
            Some(raw) => raw
                .parse::<f32>()
                .context("OPENAI_FREQUENCY_PENALTY must be a number")?,
            None => DEFAULT_FREQUENCY_PENALTY,
        };

        Ok(Config {
            openai_api_key,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_temperature,
            openai_frequency_penalty,
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Applies the configured model settings on top of `base`. The key in
    /// `base` is kept.
    pub fn apply_model_overrides(&self, base: ModelConfig) -> ModelConfig {
        base.with_model(self.openai_model.clone())
            .with_temperature(self.openai_temperature)
            .with_frequency_penalty(self.openai_frequency_penalty)
            .with_base_url(self.openai_base_url.clone())
    }
}
