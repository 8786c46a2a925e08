use serde::{Deserialize, Serialize};

use crate::core::constants::{ASSISTANT_SENDER, USER_SENDER};

/// One entry of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub sender: String,
    pub message: String,
}

impl Turn {
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
        }
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self::new(USER_SENDER, message)
    }

    pub fn assistant(message: impl Into<String>) -> Self {
        Self::new(ASSISTANT_SENDER, message)
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == ASSISTANT_SENDER
    }
}

/// The `sender: message` form used both in prompts and on screen.
impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.sender, self.message)
    }
}
