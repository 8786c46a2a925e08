//! The chat session ties the transcript, the provider and the stored
//! preferences together for the front end.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::constants::{ASSISTANT_SENDER, PROVIDER_ERROR_PREFIX, USER_SENDER};
use crate::core::conversation::Conversation;
use crate::core::message::Turn;
use crate::core::provider::{ChatProvider, CompletionRequest, ProviderError, Reply};
use crate::core::settings::{Settings, SettingsError, SettingsStore, Theme};

#[derive(Debug)]
pub enum SendError {
    /// The input was empty or whitespace only; nothing was recorded.
    EmptyMessage,
    Provider(ProviderError),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::EmptyMessage => f.write_str("message is empty"),
            SendError::Provider(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for SendError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SendError::EmptyMessage => None,
            SendError::Provider(err) => Some(err),
        }
    }
}

/// Text recorded in place of a reply when the provider fails.
pub fn provider_error_text(err: &ProviderError) -> String {
    format!("{PROVIDER_ERROR_PREFIX} ({err})")
}

pub struct ChatSession {
    provider: Arc<dyn ChatProvider>,
    store: SettingsStore,
    settings: Settings,
    model: String,
    conversation: Conversation,
}

impl ChatSession {
    /// Start a session with the preferences currently on disk.
    pub fn new(provider: Arc<dyn ChatProvider>, store: SettingsStore) -> Self {
        let settings = store.load();
        info!(theme = %settings.theme, model = %settings.model, "session started");
        Self {
            provider,
            store,
            model: settings.model.clone(),
            settings,
            conversation: Conversation::new(),
        }
    }

    /// Use `model` for this run only; the stored preference is untouched.
    pub fn with_model_override(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn transcript(&self) -> &Conversation {
        &self.conversation
    }

    /// Send `input` and return the reply, or the typed failure.
    ///
    /// The prompt is built from the transcript as it stood before this
    /// message. The user turn is recorded even if the provider fails; the
    /// reply turn only on success.
    pub async fn exchange(
        &mut self,
        input: &str,
        chunk_tx: Option<mpsc::UnboundedSender<String>>,
    ) -> Result<Reply, SendError> {
        let message = input.trim();
        if message.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        let prompt = self.conversation.build_prompt(message);
        self.conversation.append(USER_SENDER, message);

        let mut request = CompletionRequest::single(self.model.clone(), prompt);
        if let Some(tx) = chunk_tx {
            request = request.with_chunk_sink(tx);
        }

        let reply = self
            .provider
            .complete(request)
            .await
            .map_err(SendError::Provider)?;
        self.conversation
            .append(ASSISTANT_SENDER, reply.content.clone());
        Ok(reply)
    }

    /// Send `input` and return the assistant turn to display.
    ///
    /// Provider failures are recorded as an assistant turn carrying the
    /// error text. Returns `None` only for blank input.
    pub async fn send(
        &mut self,
        input: &str,
        chunk_tx: Option<mpsc::UnboundedSender<String>>,
    ) -> Option<&Turn> {
        match self.exchange(input, chunk_tx).await {
            Ok(_) => {}
            Err(SendError::EmptyMessage) => return None,
            Err(SendError::Provider(err)) => {
                warn!(error = %err, model = %self.model, "completion failed");
                self.conversation
                    .append(ASSISTANT_SENDER, provider_error_text(&err));
            }
        }
        self.conversation.last()
    }

    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    /// Switch models and persist the choice.
    pub fn change_model(&mut self, model: &str) -> Result<(), SettingsError> {
        let model = model.trim();
        let updated = self.store.mutate(|settings| {
            settings.set_model(model)?;
            Ok(settings.clone())
        })?;
        self.model = updated.model.clone();
        self.settings = updated;
        Ok(())
    }

    /// Switch themes and persist the choice.
    pub fn change_theme(&mut self, theme: Theme) -> Result<(), SettingsError> {
        let updated = self.store.mutate(|settings| {
            settings.set_theme(theme);
            Ok(settings.clone())
        })?;
        self.settings = updated;
        Ok(())
    }
}
