//! Public operations of GeminiClient: chat, image Q&A, image generation.

use tracing::{debug, warn};

use crate::history::trim_history;
use crate::{AiError, GeneratedImage, ImageInput, Message, Role};

use super::client::{extract_image, response_text, GeminiClient};

const CAPTION_PROMPT: &str = "Describe this image";

impl GeminiClient {
    /// Send a conversation and return the model's reply.
    ///
    /// System messages are always sent as the system instruction. The
    /// remaining turns are trimmed to the configured history limits; all
    /// but the last are sent as prior turns and the last one as the new
    /// input.
    pub fn chat(&self, conversation: &[Message]) -> Result<String, AiError> {
        if conversation.is_empty() {
            return Err(AiError::EmptyConversation);
        }

        let (system, turns): (Vec<Message>, Vec<Message>) = conversation
            .iter()
            .cloned()
            .partition(|m| m.role == Role::System);

        // A system-only conversation still needs something to send as input.
        let (system, turns) = if turns.is_empty() {
            (Vec::new(), system)
        } else {
            (system, turns)
        };

        let limits = self.config.history;
        let trimmed = trim_history(
            &turns,
            limits.max_messages,
            limits.max_tokens,
            self.estimator.as_ref(),
        );
        debug!(
            model = %self.config.text_model,
            sent = trimmed.len(),
            total = turns.len(),
            system = system.len(),
            "chat request"
        );

        let body = self.build_chat_body(&system, &trimmed);
        let json = self.send(&self.config.text_model, &body)?;
        Ok(response_text(&json))
    }

    /// Ask a question about an image.
    pub fn ask_about_image(&self, image: &ImageInput, question: &str) -> Result<String, AiError> {
        debug!(
            model = %self.config.image_model,
            mime_type = %image.mime_type,
            bytes = image.data.len(),
            "image question"
        );

        let body = self.build_image_question_body(image, question);
        let json = self.send(&self.config.image_model, &body)?;
        Ok(response_text(&json))
    }

    /// Describe an image with a generic prompt.
    pub fn caption_image(&self, image: &ImageInput) -> Result<String, AiError> {
        self.ask_about_image(image, CAPTION_PROMPT)
    }

    /// Try to generate an image from a prompt.
    ///
    /// Returns `None` when the model or account tier does not produce
    /// images. Failures of the request itself also yield `None`; this is a
    /// capability probe, not a hard requirement.
    pub fn generate_image(&self, prompt: &str) -> Option<GeneratedImage> {
        let body = self.build_generate_image_body(prompt);
        let result = self
            .send(&self.config.image_model, &body)
            .and_then(|json| extract_image(&json));

        match result {
            Ok(Some(image)) => {
                debug!(mime_type = %image.mime_type, bytes = image.data.len(), "image generated");
                Some(image)
            }
            Ok(None) => {
                debug!(model = %self.config.image_model, "response carried no image");
                None
            }
            Err(e) => {
                warn!(model = %self.config.image_model, error = %e, "image generation unavailable");
                None
            }
        }
    }
}
