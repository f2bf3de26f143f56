pub mod errors;

pub use errors::{ConfigError, GemchatError};

/// Model used for both text and image requests unless overridden.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

pub type Result<T> = std::result::Result<T, GemchatError>;
