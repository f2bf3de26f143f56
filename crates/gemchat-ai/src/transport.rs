//! Remote endpoint seam.
//!
//! The client builds Gemini request bodies and parses responses; a
//! `Transport` only moves JSON to and from the Generative Language API.

use std::time::Duration;

use tracing::debug;

use crate::AiError;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Sends a `generateContent` request for a model.
pub trait Transport: Send + Sync {
    fn generate_content(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, AiError>;
}

/// Blocking HTTP transport backed by `reqwest`.
pub struct HttpTransport {
    api_key: String,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AiError> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: GEMINI_API_BASE.to_string(),
            http,
        })
    }

    /// Point the transport at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn api_url(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

impl Transport for HttpTransport {
    fn generate_content(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, AiError> {
        let url = self.api_url(model);

        debug!(model, "Gemini API request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        response
            .json()
            .map_err(|e| AiError::ParseError(e.to_string()))
    }
}
