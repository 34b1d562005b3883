//! Chat command handler.

use std::io::{IsTerminal, Read};

use anyhow::{Context, Result};

use crate::config::Config;

use super::ask;

/// Runs the bare command: one-shot when stdin is piped, REPL otherwise.
pub async fn run_default(config: &Config) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        let mut prompt = String::new();
        std::io::stdin().lock().read_to_string(&mut prompt)?;
        let prompt = prompt.trim();
        if prompt.is_empty() {
            anyhow::bail!("No input provided via pipe");
        }
        return ask::run(prompt, config).await;
    }

    run(config).await
}

/// Runs the interactive chat loop on stdin/stdout.
pub async fn run(config: &Config) -> Result<()> {
    crate::chat::run_interactive_chat(config)
        .await
        .context("interactive chat failed")?;

    Ok(())
}
