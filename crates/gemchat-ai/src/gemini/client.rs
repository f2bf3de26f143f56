//! Gemini API client struct, request building, and response parsing.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::history::{CharEstimator, TokenEstimator};
use crate::retry::{with_retry, Sleeper, ThreadSleeper};
use crate::transport::{HttpTransport, Transport};
use crate::{AiError, GeneratedImage, ImageInput, Message, Role};

use super::config::GeminiConfig;

/// Gemini API client.
///
/// Holds only construction-time configuration; every call is an
/// independent request/response exchange.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
    pub(crate) estimator: Arc<dyn TokenEstimator>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client talking to the hosted API over HTTP.
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        Self::check_api_key(&config)?;
        let transport = HttpTransport::new(config.api_key.clone())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client over any transport.
    pub fn with_transport(
        config: GeminiConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, AiError> {
        Self::check_api_key(&config)?;
        Ok(Self {
            config,
            transport,
            sleeper: Arc::new(ThreadSleeper),
            estimator: Arc::new(CharEstimator),
        })
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn check_api_key(config: &GeminiConfig) -> Result<(), AiError> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::Config("GOOGLE_API_KEY is required".into()));
        }
        Ok(())
    }

    /// Send a request through the retry wrapper.
    pub(crate) fn send(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, AiError> {
        with_retry(&self.config.retry, self.sleeper.as_ref(), || {
            self.transport.generate_content(model, body)
        })
    }

    fn generation_config(&self) -> serde_json::Value {
        serde_json::json!({
            "maxOutputTokens": self.config.max_output_tokens,
            "temperature": self.config.temperature,
        })
    }

    /// Build the chat request: prior turns, then the newest message as input.
    ///
    /// `messages` must be non-empty.
    /// `system` messages become the system instruction; of `messages`, the
    /// last is the new user input.
    pub(crate) fn build_chat_body(
        &self,
        system: &[Message],
        messages: &[Message],
    ) -> serde_json::Value {
        let (last, prior) = match messages.split_last() {
            Some(split) => split,
            None => return serde_json::json!({ "contents": [] }),
        };

        let mut contents = Vec::with_capacity(messages.len());
        let mut system: Vec<&str> = system.iter().map(|m| m.content.as_str()).collect();

        for msg in prior {
            match msg.role {
                Role::System => system.push(msg.content.as_str()),
                Role::User | Role::Model => contents.push(serde_json::json!({
                    "role": msg.role.as_str(),
                    "parts": [{ "text": msg.content }]
                })),
            }
        }

        contents.push(serde_json::json!({
            "role": "user",
            "parts": [{ "text": last.content }]
        }));

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": self.generation_config(),
        });

        if !system.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system.join("\n\n") }]
            });
        }

        body
    }

    pub(crate) fn build_image_question_body(
        &self,
        image: &ImageInput,
        question: &str,
    ) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": STANDARD.encode(&image.data),
                        }
                    },
                    { "text": question }
                ]
            }],
            "generationConfig": self.generation_config(),
        })
    }

    pub(crate) fn build_generate_image_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "temperature": self.config.temperature,
            }
        })
    }
}

fn candidate_parts(json: &serde_json::Value) -> impl Iterator<Item = &serde_json::Value> {
    json["candidates"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|c| c["content"]["parts"].as_array())
        .flatten()
}

/// Text of the first candidate, or the raw response when it carries none.
pub(crate) fn response_text(json: &serde_json::Value) -> String {
    let first = json["candidates"]
        .as_array()
        .and_then(|c| c.first())
        .and_then(|c| c["content"]["parts"].as_array());

    let mut text: Option<String> = None;
    for part in first.into_iter().flatten() {
        if let Some(t) = part["text"].as_str() {
            text.get_or_insert_with(String::new).push_str(t);
        }
    }

    text.unwrap_or_else(|| json.to_string())
}

/// First inline image in any candidate.
pub(crate) fn extract_image(json: &serde_json::Value) -> Result<Option<GeneratedImage>, AiError> {
    for part in candidate_parts(json) {
        let Some(inline) = part.get("inlineData") else {
            continue;
        };
        let mime_type = inline["mimeType"].as_str().unwrap_or_default();
        if !mime_type.starts_with("image/") {
            continue;
        }
        let encoded = inline["data"]
            .as_str()
            .ok_or_else(|| AiError::ParseError("inline image without data".into()))?;
        let data = STANDARD
            .decode(encoded)
            .map_err(|e| AiError::ParseError(format!("invalid image data: {e}")))?;
        return Ok(Some(GeneratedImage {
            data,
            mime_type: mime_type.to_string(),
        }));
    }
    Ok(None)
}
