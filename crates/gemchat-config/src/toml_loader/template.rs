//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub fn default_config_toml() -> &'static str {
    r##"# gemchat configuration
# Only override what you want to change -- missing fields use defaults.
# The API key is never read from this file; set GOOGLE_API_KEY instead.

[models]
# GEMINI_MODEL and IMAGE_MODEL environment variables take precedence.
text = "gemini-1.5-pro"
image = "gemini-1.5-pro"

[history]
# max_messages = 20      # 1-1000, newest turn is always kept
# max_tokens = 8000      # approximate budget (about 4 characters per token)

[retry]
# max_attempts = 3       # 1-10, including the first call
# base_delay_ms = 1000   # doubles on every rate-limited retry

[generation]
# max_output_tokens = 2048
# temperature = 0.7      # 0.0-2.0
"##
}
