//! Ask command handler.

use anyhow::Result;

use crate::chat::{ChatController, SubmitOutcome};
use crate::config::Config;

/// Sends one prompt and prints the reply to stdout.
pub async fn run(prompt: &str, config: &Config) -> Result<()> {
    let mut controller = ChatController::from_config(config)?;

    match controller.submit(prompt).await {
        SubmitOutcome::Replied(reply) => {
            println!("{}", reply);
            Ok(())
        }
        SubmitOutcome::Skipped => anyhow::bail!("Prompt is empty"),
    }
}
