use tokio::sync::mpsc;
use tracing::warn;

use crate::core::message::Turn;
use crate::core::session::ChatSession;
use crate::utils::logging::LoggingState;

/// State of an interactive run: the chat session plus the transcript log.
pub struct App {
    pub session: ChatSession,
    pub logging: LoggingState,
}

impl App {
    pub fn new(session: ChatSession, logging: LoggingState) -> Self {
        Self { session, logging }
    }

    /// Send a message and log every turn it added.
    ///
    /// Returns the assistant turn to display, or `None` for blank input.
    pub async fn send(
        &mut self,
        input: &str,
        chunk_tx: Option<mpsc::UnboundedSender<String>>,
    ) -> Option<Turn> {
        let first_new = self.session.transcript().len();
        let turn = self.session.send(input, chunk_tx).await.cloned()?;

        for logged in &self.session.transcript().turns()[first_new..] {
            if let Err(err) = self.logging.log_turn(logged) {
                warn!(error = %err, "failed to write transcript log");
            }
        }
        Some(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::SettingsStore;
    use crate::utils::test_utils::ScriptedProvider;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn send_logs_user_and_assistant_turns() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("chat.log");
        let provider = ScriptedProvider::new().failing("offline").into_arc();
        let session = ChatSession::new(
            provider,
            SettingsStore::new(temp_dir.path().join("settings.json")),
        );
        let mut app = App::new(session, LoggingState::new(Some(log_path.clone())).unwrap());

        let turn = app.send("Hello", None).await.expect("turn expected");
        assert!(turn.message.starts_with("Error: "));
        assert!(app.send("  ", None).await.is_none());

        let contents = fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains(
            "User: Hello\n\nChatGPT: Error: Unable to get response from ChatGPT (offline)\n\n"
        ));
    }
}
