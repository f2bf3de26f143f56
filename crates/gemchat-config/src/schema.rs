//! Configuration schema types for gemchat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use gemchat_common::DEFAULT_MODEL;

/// Root configuration for gemchat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GemchatConfig {
    pub models: ModelsConfig,
    pub history: HistoryConfig,
    pub retry: RetryConfig,
    pub generation: GenerationConfig,
}

/// Model identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub text: String,
    pub image: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_MODEL.into(),
            image: DEFAULT_MODEL.into(),
        }
    }
}

/// Limits applied to the conversation before each chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_messages: usize,
    /// Approximate token budget for the history sent with a request.
    pub max_tokens: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_messages: 20,
            max_tokens: 8000,
        }
    }
}

/// Backoff on rate-limited requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 2048,
            temperature: 0.7,
        }
    }
}
