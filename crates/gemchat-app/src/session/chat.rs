//! The running conversation and its request/response turn.

use gemchat_ai::{AiError, GeminiClient, Message};
use tracing::debug;

/// A conversation in progress.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    system_prompt: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Append a user turn, ask the model, and append its reply.
    ///
    /// On failure the user turn is removed again so the history never
    /// holds an unanswered message.
    pub fn send(&mut self, client: &GeminiClient, input: impl Into<String>) -> Result<String, AiError> {
        self.messages.push(Message::user(input));

        match client.chat(&self.build_messages()) {
            Ok(reply) => {
                self.messages.push(Message::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                debug!(error = %e, "chat failed, dropping pending turn");
                self.messages.pop();
                Err(e)
            }
        }
    }

    fn build_messages(&self) -> Vec<Message> {
        let mut msgs = Vec::with_capacity(self.messages.len() + 1);
        if let Some(ref system) = self.system_prompt {
            msgs.push(Message::system(system.clone()));
        }
        msgs.extend(self.messages.iter().cloned());
        msgs
    }

    /// Get the conversation history (without the system prompt).
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Replace the history, e.g. with a saved conversation.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
