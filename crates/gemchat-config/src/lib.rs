//! gemchat configuration system.
//!
//! Settings come from built-in defaults, an optional TOML file, and the
//! process environment (including a `.env` file), in that order. All
//! config sections use sensible defaults so partial configs work.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gemchat_config::{load_config, Credentials};
//!
//! gemchat_config::load_dotenv();
//! let config = load_config(None).expect("failed to load config");
//! let creds = Credentials::from_env().expect("GOOGLE_API_KEY not set");
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::{apply_env_overrides, load_dotenv, Credentials};
pub use schema::{GemchatConfig, GenerationConfig, HistoryConfig, ModelsConfig, RetryConfig};

use std::path::Path;

use gemchat_common::ConfigError;

/// Load, override, and validate the effective configuration.
///
/// An explicit `path` must exist; without one the platform default path
/// is tried and a missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<GemchatConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a TOML string.
pub fn config_to_toml(config: &GemchatConfig) -> String {
    toml::to_string_pretty(config)
        .unwrap_or_else(|e| format!("# failed to serialize config: {e}\n"))
}
