//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;

use crate::config;

mod commands;

#[derive(Parser)]
#[command(name = "gradchat")]
#[command(version = "0.1")]
#[command(about = "Terminal chat client for a Gradio-hosted assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the Gradio space base URL from config
    #[arg(long, value_name = "URL")]
    url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Starts an interactive chat session
    Chat,

    /// Sends a single prompt and prints the reply
    Ask {
        /// The prompt to send
        #[arg(short, long)]
        prompt: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = config::Config::load().context("load config")?;

    // The flag lands in config; GRADCHAT_BASE_URL still wins at resolution.
    if let Some(url) = cli.url.as_deref() {
        let trimmed = url.trim();
        if !trimmed.is_empty() {
            config.base_url = Some(trimmed.to_string());
        }
    }

    // default to chat mode
    let Some(command) = cli.command else {
        return commands::chat::run_default(&config).await;
    };

    match command {
        Commands::Chat => commands::chat::run(&config).await,

        Commands::Ask { prompt } => commands::ask::run(&prompt, &config).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
