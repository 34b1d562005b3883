//! Session transcript view-model.
//!
//! Holds the ordered user/bot messages for the current session and the
//! waiting-slot mechanics used while a request is in flight. Nothing here
//! touches the terminal; rendering is the chat loop's job.

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A single transcript entry.
///
/// Bot content is rendered HTML; user content is the raw submitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            content: content.into(),
        }
    }
}

/// Ordered message list for one session. No persistence.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    waiting: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends the user's submitted text.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Appends a provisional bot message and remembers it for replacement.
    pub fn push_waiting(&mut self, placeholder: impl Into<String>) {
        self.waiting = Some(self.messages.len());
        self.messages.push(Message::bot(placeholder));
    }

    /// Records the final bot message, replacing a pending placeholder in
    /// place when one exists.
    pub fn resolve_bot(&mut self, content: impl Into<String>) {
        match self.waiting.take().and_then(|i| self.messages.get_mut(i)) {
            Some(slot) => slot.content = content.into(),
            None => self.messages.push(Message::bot(content)),
        }
    }
}
