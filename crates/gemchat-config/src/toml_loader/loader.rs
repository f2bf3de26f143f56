//! Core TOML config loading: read from path or platform default.

use crate::schema::GemchatConfig;
use gemchat_common::ConfigError;
use std::path::Path;
use tracing::{debug, info};

use super::paths::default_config_path;

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
pub fn load_from_path(path: &Path) -> Result<GemchatConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
        }
    })?;

    let config: GemchatConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from a file that may legitimately be absent.
///
/// A missing file yields the defaults; any other failure is an error.
pub fn load_optional(path: &Path) -> Result<GemchatConfig, ConfigError> {
    match load_from_path(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            debug!("no config at {}, using defaults", path.display());
            Ok(GemchatConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/gemchat/config.toml`
/// On Linux: `~/.config/gemchat/config.toml`
pub fn load_default() -> Result<GemchatConfig, ConfigError> {
    let path = default_config_path()?;
    load_optional(&path)
}
