//! Configuration validation.
//!
//! Each section is checked in turn and all errors are collected into a
//! single `ConfigError`.

mod helpers;


use crate::schema::GemchatConfig;
use gemchat_common::ConfigError;

use helpers::{validate_not_blank, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GemchatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_not_blank(&mut errors, "models.text", &config.models.text);
    validate_not_blank(&mut errors, "models.image", &config.models.image);

    validate_range(
        &mut errors,
        "history.max_messages",
        config.history.max_messages as u64,
        1,
        1000,
    );
    validate_range(
        &mut errors,
        "history.max_tokens",
        config.history.max_tokens as u64,
        1,
        2_000_000,
    );

    validate_range(
        &mut errors,
        "retry.max_attempts",
        config.retry.max_attempts as u64,
        1,
        10,
    );
    validate_range(
        &mut errors,
        "retry.base_delay_ms",
        config.retry.base_delay_ms,
        0,
        60_000,
    );

    validate_range(
        &mut errors,
        "generation.max_output_tokens",
        config.generation.max_output_tokens as u64,
        1,
        65_536,
    );
    validate_range_f64(
        &mut errors,
        "generation.temperature",
        config.generation.temperature,
        0.0,
        2.0,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
