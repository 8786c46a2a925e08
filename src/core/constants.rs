//! Shared constants used across the application

/// Sender name recorded for turns typed by the user.
pub const USER_SENDER: &str = "User";

/// Sender name recorded for turns produced by the completion provider,
/// including the error text substituted when a request fails.
pub const ASSISTANT_SENDER: &str = "ChatGPT";

/// Instruction placed at the top of every prompt.
pub const PROMPT_PREAMBLE: &str = "You are a helpful assistant in a desktop chat application. \
Use the conversation so far as context and reply to the user's latest message.";

/// Prefix of the assistant turn recorded when the provider call fails.
pub const PROVIDER_ERROR_PREFIX: &str = "Error: Unable to get response from ChatGPT";

/// Base URL used when `OPENAI_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Published tags for this project, newest first.
pub const RELEASE_TAGS_URL: &str = "https://api.github.com/repos/ItsJesewe/chatgpt-app/tags";
