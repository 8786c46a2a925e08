//! Transcript bookkeeping and prompt assembly.
//!
//! The provider only ever sees a single user message, so prior turns are
//! folded into that message as plain `sender: message` lines.

use crate::core::constants::{PROMPT_PREAMBLE, USER_SENDER};
use crate::core::message::Turn;

/// Ordered record of the conversation, newest turn last.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a turn. Input validation happens in the caller.
    pub fn append(&mut self, sender: impl Into<String>, message: impl Into<String>) {
        self.turns.push(Turn::new(sender, message));
    }

    /// Every turn as `sender: message`, one per line, oldest first.
    pub fn render_context(&self) -> String {
        self.turns
            .iter()
            .map(Turn::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Assemble the text submitted to the provider for `user_message`.
    ///
    /// The new message is not part of the transcript yet; it is appended
    /// after the rendered context under the user sender name.
    pub fn build_prompt(&self, user_message: &str) -> String {
        let mut prompt = String::from(PROMPT_PREAMBLE);
        if !self.turns.is_empty() {
            prompt.push_str("\n\nConversation so far:\n");
            prompt.push_str(&self.render_context());
        }
        prompt.push_str("\n\n");
        prompt.push_str(USER_SENDER);
        prompt.push_str(": ");
        prompt.push_str(user_message);
        prompt
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
