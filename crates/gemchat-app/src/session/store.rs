//! Saved conversations, kept in memory for the current process.

use chrono::{DateTime, Local};
use gemchat_ai::{Message, Role};

const PREVIEW_MESSAGES: usize = 3;
const PREVIEW_CHARS: usize = 100;

/// A snapshot of a conversation saved under a title.
#[derive(Debug, Clone)]
pub struct SavedConversation {
    pub title: String,
    pub timestamp: DateTime<Local>,
    pub messages: Vec<Message>,
}

impl SavedConversation {
    /// Short summary: the first few messages, truncated.
    pub fn preview(&self) -> String {
        let mut lines = Vec::new();
        for msg in self.messages.iter().take(PREVIEW_MESSAGES) {
            let who = match msg.role {
                Role::User => "You",
                Role::Model => "Gemini",
                Role::System => "System",
            };
            lines.push(format!("{who}: {}", truncate(&msg.content, PREVIEW_CHARS)));
        }
        if self.messages.len() > PREVIEW_MESSAGES {
            lines.push(format!(
                "... and {} more messages",
                self.messages.len() - PREVIEW_MESSAGES
            ));
        }
        lines.join("\n")
    }

    pub fn created(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M").to_string()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn default_title(now: &DateTime<Local>) -> String {
    format!("Conversation {}", now.format("%Y-%m-%d %H:%M"))
}

/// Saved conversations, in the order they were saved.
#[derive(Debug, Default)]
pub struct ConversationStore {
    saved: Vec<SavedConversation>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a copy of `messages`. A missing or blank title gets a dated default.
    pub fn save(&mut self, messages: &[Message], title: Option<&str>) -> &SavedConversation {
        self.save_at(messages, title, Local::now())
    }

    pub(crate) fn save_at(
        &mut self,
        messages: &[Message],
        title: Option<&str>,
        now: DateTime<Local>,
    ) -> &SavedConversation {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_title(&now));

        self.saved.push(SavedConversation {
            title,
            timestamp: now,
            messages: messages.to_vec(),
        });
        &self.saved[self.saved.len() - 1]
    }

    pub fn list(&self) -> &[SavedConversation] {
        &self.saved
    }

    pub fn get(&self, index: usize) -> Option<&SavedConversation> {
        self.saved.get(index)
    }

    pub fn delete(&mut self, index: usize) -> Option<SavedConversation> {
        if index < self.saved.len() {
            Some(self.saved.remove(index))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}
