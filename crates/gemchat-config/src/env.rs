//! Environment-supplied settings: `.env` loading, credentials, overrides.

use std::path::PathBuf;

use gemchat_common::ConfigError;
use tracing::{debug, warn};

use crate::schema::GemchatConfig;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const TEXT_MODEL_VAR: &str = "GEMINI_MODEL";
pub const IMAGE_MODEL_VAR: &str = "IMAGE_MODEL";

/// Load a `.env` file from the current directory or its ancestors.
///
/// Variables already set in the process environment are not replaced.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!("failed to load .env: {e}");
            None
        }
    }
}

/// API credential for the hosted model service.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Read `GOOGLE_API_KEY` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(API_KEY_VAR) {
            Some(key) if !key.trim().is_empty() => Ok(Self {
                api_key: key.trim().to_string(),
            }),
            _ => Err(ConfigError::MissingEnv(API_KEY_VAR.into())),
        }
    }
}

/// Apply `GEMINI_MODEL` / `IMAGE_MODEL` from the process environment.
pub fn apply_env_overrides(config: &mut GemchatConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

pub fn apply_overrides_from(config: &mut GemchatConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(model) = lookup(TEXT_MODEL_VAR).filter(|m| !m.trim().is_empty()) {
        config.models.text = model.trim().to_string();
    }
    if let Some(model) = lookup(IMAGE_MODEL_VAR).filter(|m| !m.trim().is_empty()) {
        config.models.image = model.trim().to_string();
    }
}
