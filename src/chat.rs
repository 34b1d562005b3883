//! Interactive chat module.
//!
//! Provides a REPL-style chat interface over the two-phase predict client.
//! One request is in flight at a time; the loop waits for each reply before
//! reading the next line.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::config::Config;
use crate::markdown::{self, MarkdownOptions};
use crate::providers::{GradioClient, GradioConfig};
use crate::transcript::Transcript;

const QUIT_COMMAND: &str = ":q";
const PROMPT_PREFIX: &str = "you> ";
const BOT_PREFIX: &str = "bot> ";
const WAITING_PLACEHOLDER: &str = "Thinking...";

/// What a single submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank after trimming; nothing was recorded or sent.
    Skipped,
    /// A bot reply (result or error text) was recorded.
    Replied(String),
}

/// Drives one session: validates input, records transcript entries, calls
/// the client, and formats replies.
///
/// `submit` takes `&mut self`, so a second request cannot start while one
/// is pending.
pub struct ChatController {
    client: GradioClient,
    transcript: Transcript,
    markdown: MarkdownOptions,
    waiting: bool,
}

impl ChatController {
    /// Builds a controller from config, resolving the endpoint from the
    /// environment.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gradio_config = GradioConfig::from_env(config.base_url.as_deref())?;
        Ok(Self::new(GradioClient::new(gradio_config), config))
    }

    pub fn new(client: GradioClient, config: &Config) -> Self {
        tracing::debug!(base_url = %client.base_url(), "Chat session ready");
        Self {
            client,
            transcript: Transcript::new(),
            markdown: MarkdownOptions {
                lists: config.lists,
            },
            waiting: config.waiting,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn waiting_enabled(&self) -> bool {
        self.waiting
    }

    /// Submits one query and returns the recorded reply.
    ///
    /// Whitespace-only input is dropped before any message or network call.
    /// Otherwise the raw untrimmed text is recorded and sent, as the widget
    /// did. A client error surfaces as its display string and flows through
    /// the same formatting path as a result.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        if input.trim().is_empty() {
            return SubmitOutcome::Skipped;
        }

        self.transcript.push_user(input);
        if self.waiting {
            self.transcript.push_waiting(WAITING_PLACEHOLDER);
        }

        let text = match self.client.predict(input).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Prediction failed");
                e.user_message()
            }
        };

        let html = markdown::to_html(&text, &self.markdown);
        self.transcript.resolve_bot(html.clone());
        SubmitOutcome::Replied(html)
    }
}

/// Runs the interactive chat loop.
///
/// Reads user input from `input`, writes replies to `output`.
/// Exits on `:q` command or EOF.
pub async fn run_chat<R, W>(
    input: R,
    output: &mut W,
    controller: &mut ChatController,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        // Handle quit command
        if trimmed == QUIT_COMMAND {
            writeln!(output, "Goodbye!")?;
            break;
        }

        // Skip empty lines
        if trimmed.is_empty() {
            write!(output, "{}", PROMPT_PREFIX)?;
            output.flush()?;
            continue;
        }

        // Progress note goes to stderr so stdout stays reply-only
        if controller.waiting_enabled() {
            eprint!("{}", WAITING_PLACEHOLDER);
            let _ = std::io::stderr().flush();
        }

        let outcome = controller.submit(&line).await;

        if controller.waiting_enabled() {
            eprintln!(" done.");
        }

        if let SubmitOutcome::Replied(reply) = outcome {
            writeln!(output, "{}{}", BOT_PREFIX, reply)?;
        }

        write!(output, "{}", PROMPT_PREFIX)?;
        output.flush()?;
    }

    Ok(())
}

/// Runs the chat loop with stdin/stdout.
pub async fn run_interactive_chat(config: &Config) -> Result<()> {
    let mut controller = ChatController::from_config(config)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "gradchat (type :q to quit)")?;
    write!(stdout, "{}", PROMPT_PREFIX)?;
    stdout.flush()?;

    run_chat(stdin.lock(), &mut stdout, &mut controller).await
}
