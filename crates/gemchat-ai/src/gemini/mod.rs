//! Google Gemini API client.
//!
//! Chat, image Q&A, and image generation over the Generative Language
//! API, with history trimming and rate-limit retries.

mod api;
mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::GeminiClient;
pub use config::{GeminiConfig, DEFAULT_MODEL};
