//! Conversation history trimming.
//!
//! Bounds the payload sent to the model by message count and an
//! approximate token budget. The newest turn is always kept.

use crate::Message;

/// Estimates how many tokens a message costs.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, message: &Message) -> usize;
}

/// Local heuristic: roughly four characters per token.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharEstimator;

impl TokenEstimator for CharEstimator {
    fn estimate(&self, message: &Message) -> usize {
        message.content.chars().count().div_ceil(4)
    }
}

/// Limits applied before every chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    pub max_messages: usize,
    pub max_tokens: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            max_messages: 20,
            max_tokens: 8000,
        }
    }
}

/// Reduce a conversation to a suffix that fits both limits.
///
/// Conversations no longer than `max_messages` are returned unchanged.
/// Otherwise the last `max_messages` are kept and then shortened from
/// the front until the estimated total fits `max_tokens`, never past the
/// final message. A `max_messages` of zero behaves like one.
pub fn trim_history(
    conversation: &[Message],
    max_messages: usize,
    max_tokens: usize,
    estimator: &dyn TokenEstimator,
) -> Vec<Message> {
    if conversation.len() <= max_messages {
        return conversation.to_vec();
    }

    let max_messages = max_messages.max(1);
    let window = &conversation[conversation.len() - max_messages..];

    // Walk backwards from the newest turn; the first message is always taken.
    let mut total = 0usize;
    let mut start = window.len();
    for (i, msg) in window.iter().enumerate().rev() {
        let cost = estimator.estimate(msg);
        if start < window.len() && total.saturating_add(cost) > max_tokens {
            break;
        }
        total = total.saturating_add(cost);
        start = i;
    }

    window[start..].to_vec()
}
