//! Gemini API client configuration.

use crate::history::HistoryLimits;
use crate::retry::RetryPolicy;

pub use gemchat_common::DEFAULT_MODEL;

/// Gemini API client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub history: HistoryLimits,
    pub retry: RetryPolicy,
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("history", &self.history)
            .field("retry", &self.retry)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            text_model: DEFAULT_MODEL.to_string(),
            image_model: DEFAULT_MODEL.to_string(),
            history: HistoryLimits::default(),
            retry: RetryPolicy::default(),
            max_output_tokens: 2048,
            temperature: 0.7,
        }
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_history(mut self, history: HistoryLimits) -> Self {
        self.history = history;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}
