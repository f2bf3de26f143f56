mod cli;
mod image;
mod repl;
mod session;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gemchat_ai::{GeminiClient, GeminiConfig, HistoryLimits, RetryPolicy};
use gemchat_common::GemchatError;
use gemchat_config::{Credentials, GemchatConfig};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};
use session::{ChatSession, ConversationStore};

const IMAGE_UNAVAILABLE: &str = "Image generation is not available with your current model or \
account tier. You can still ask questions about existing images with `gemchat ask`.";

const DEFAULT_LOG_DIRECTIVE: &str = "gemchat=info";

/// The `--log-level` directive, or the default when absent or unparsable.
fn log_directive(level: Option<&str>) -> Directive {
    level
        .and_then(|l| l.parse().ok())
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.parse().expect("static directive"))
}

/// Map file settings and credentials onto the client configuration.
fn client_config(config: &GemchatConfig, creds: &Credentials) -> Result<GeminiConfig, GemchatError> {
    let retry = RetryPolicy::new(config.retry.max_attempts, config.retry.base_delay())
        .map_err(|e| GemchatError::Ai(e.to_string()))?;

    Ok(GeminiConfig::new(creds.api_key.clone())
        .with_text_model(config.models.text.clone())
        .with_image_model(config.models.image.clone())
        .with_history(HistoryLimits {
            max_messages: config.history.max_messages,
            max_tokens: config.history.max_tokens,
        })
        .with_retry(retry)
        .with_max_output_tokens(config.generation.max_output_tokens)
        .with_temperature(config.generation.temperature))
}

fn build_client(config: &GemchatConfig) -> Result<GeminiClient, GemchatError> {
    let creds = Credentials::from_env()?;
    GeminiClient::new(client_config(config, &creds)?).map_err(|e| GemchatError::Ai(e.to_string()))
}

fn generated_path(out: Option<PathBuf>, extension: &str) -> PathBuf {
    out.unwrap_or_else(|| PathBuf::from(format!("generated.{extension}")))
}

fn run(args: Args) -> gemchat_common::Result<()> {
    if let Command::Config { init: true } = args.command {
        let path = match args.config {
            Some(path) => path,
            None => gemchat_config::toml_loader::default_config_path()?,
        };
        gemchat_config::toml_loader::create_default_config(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = gemchat_config::load_config(args.config.as_deref())?;
    tracing::info!(
        text_model = %config.models.text,
        image_model = %config.models.image,
        "config loaded"
    );

    match args.command {
        Command::Config { .. } => {
            print!("{}", gemchat_config::config_to_toml(&config));
        }
        Command::Chat { system } => {
            let client = build_client(&config)?;
            let mut session = match system {
                Some(prompt) => ChatSession::new().with_system_prompt(prompt),
                None => ChatSession::new(),
            };
            let mut store = ConversationStore::new();
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            repl::run(&client, &mut session, &mut store, stdin.lock(), &mut stdout)?;
        }
        Command::Ask { image, question } => {
            let client = build_client(&config)?;
            let image = image::load_image(&image)?;
            let answer = client
                .ask_about_image(&image, &question)
                .map_err(|e| GemchatError::Ai(e.to_string()))?;
            println!("{answer}");
        }
        Command::Caption { image } => {
            let client = build_client(&config)?;
            let image = image::load_image(&image)?;
            let caption = client
                .caption_image(&image)
                .map_err(|e| GemchatError::Ai(e.to_string()))?;
            println!("{caption}");
        }
        Command::Generate { prompt, out } => {
            let client = build_client(&config)?;
            match client.generate_image(&prompt) {
                Some(generated) => {
                    let path = generated_path(out, generated.extension());
                    write_image(&path, &generated.data)?;
                    println!("Image saved to {}", path.display());
                }
                None => println!("{IMAGE_UNAVAILABLE}"),
            }
        }
    }

    Ok(())
}

fn write_image(path: &Path, data: &[u8]) -> gemchat_common::Result<()> {
    std::fs::write(path, data)?;
    tracing::debug!(bytes = data.len(), "wrote {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    // Load .env before anything reads the environment
    gemchat_config::load_dotenv();

    let args = cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(log_directive(args.log_level.as_deref())),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("command failed: {e:?}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
