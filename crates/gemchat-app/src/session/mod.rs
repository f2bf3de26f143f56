//! Conversation state owned by the front-end.
//!
//! The client is stateless; the running conversation and the saved
//! conversations live here for the lifetime of the process.

mod chat;
mod store;

pub use chat::ChatSession;
pub use store::{ConversationStore, SavedConversation};
