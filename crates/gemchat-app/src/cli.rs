use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gemchat: chat and image Q&A with Gemini from the terminal.
#[derive(Parser, Debug)]
#[command(name = "gemchat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat session.
    Chat {
        /// System instruction sent with every request.
        #[arg(long)]
        system: Option<String>,
    },
    /// Ask a question about an image.
    Ask {
        image: PathBuf,
        #[arg(default_value = "Describe this image in detail")]
        question: String,
    },
    /// Describe an image.
    Caption { image: PathBuf },
    /// Generate an image from a prompt, if the model supports it.
    Generate {
        prompt: String,
        /// Output file (defaults to `generated.<ext>`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the effective configuration.
    Config {
        /// Write a documented default config file instead.
        #[arg(long)]
        init: bool,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
