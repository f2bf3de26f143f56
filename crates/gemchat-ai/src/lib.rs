//! AI engine for gemchat.
//!
//! Provides a blocking Gemini API client with:
//! - History trimming by message count and approximate token budget
//! - Bounded exponential backoff on rate-limit failures
//! - Chat, image Q&A, and best-effort image generation

pub mod gemini;
pub mod history;
pub mod retry;
pub mod transport;

pub use gemini::{GeminiClient, GeminiConfig};
pub use history::{trim_history, CharEstimator, HistoryLimits, TokenEstimator};
pub use retry::{with_retry, RetryPolicy, Sleeper, ThreadSleeper};
pub use transport::{HttpTransport, Transport};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            Role::System => "system",
        }
    }
}

/// An encoded image submitted alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn png(data: Vec<u8>) -> Self {
        Self::new(data, "image/png")
    }
}

/// Image bytes returned by a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    /// File extension matching the mime type, `bin` when unknown.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("conversation is empty")]
    EmptyConversation,
    #[error("Rate limited")]
    RateLimited,
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

impl AiError {
    /// Whether the remote endpoint is throttling requests.
    ///
    /// Besides the explicit `RateLimited` variant, an API error whose body
    /// carries the `RESOURCE_EXHAUSTED` status counts too.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            AiError::RateLimited => true,
            AiError::ApiError(msg) => msg.contains("RESOURCE_EXHAUSTED"),
            _ => false,
        }
    }
}
