//! The completion provider seam and its OpenAI-compatible implementation.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{construct_api_url, ChatMessage, ChatRequest};
use crate::core::chat_stream::{summarize_api_error, SseDecoder, StreamMessage};
use crate::core::constants::DEFAULT_BASE_URL;

/// A single request to the provider.
#[derive(Debug)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Receives each piece of text as it streams in. The full reply is
    /// still returned from [`ChatProvider::complete`].
    pub chunk_tx: Option<mpsc::UnboundedSender<String>>,
}

impl CompletionRequest {
    /// A request carrying one user message, the shape every prompt uses.
    pub fn single(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            chunk_tx: None,
        }
    }

    pub fn with_chunk_sink(mut self, chunk_tx: mpsc::UnboundedSender<String>) -> Self {
        self.chunk_tx = Some(chunk_tx);
        self
    }

    fn forward_chunk(&self, chunk: &str) {
        if let Some(tx) = &self.chunk_tx {
            let _ = tx.send(chunk.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
}

impl Reply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug)]
pub enum ProviderError {
    /// The request could not be sent or the response body broke off.
    Transport(reqwest::Error),

    /// The provider answered with an error status or an in-stream error.
    Api {
        status: Option<u16>,
        message: String,
    },

    /// The stream ended without any content.
    EmptyReply,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(source) => write!(f, "{source}"),
            ProviderError::Api {
                status: Some(status),
                message,
            } => write!(f, "HTTP {status}: {message}"),
            ProviderError::Api {
                status: None,
                message,
            } => f.write_str(message),
            ProviderError::EmptyReply => f.write_str("the provider returned an empty reply"),
        }
    }
}

impl StdError for ProviderError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ProviderError::Transport(source) => Some(source),
            ProviderError::Api { .. } | ProviderError::EmptyReply => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(source: reqwest::Error) -> Self {
        ProviderError::Transport(source)
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Reply, ProviderError>;
}

/// Talks to any endpoint implementing the OpenAI `chat/completions` API.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Configure from `OPENAI_BASE_URL` and `OPENAI_API_KEY`.
    pub fn from_env(client: reqwest::Client) -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        Self::new(client, base_url, api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Reply, ProviderError> {
        let chat_url = construct_api_url(&self.base_url, "chat/completions");
        debug!(url = %chat_url, model = %request.model, "sending completion request");

        let body = ChatRequest {
            model: request.model.clone(),
            messages: request.messages.clone(),
            stream: true,
        };

        let mut http_request = self
            .client
            .post(&chat_url)
            .header("Content-Type", "application/json");
        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            debug!(%status, "completion request rejected");
            return Err(ProviderError::Api {
                status: Some(status.as_u16()),
                message: summarize_api_error(&error_text),
            });
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut content = String::new();

        'stream: while let Some(chunk) = stream.next().await {
            for message in decoder.feed(&chunk?) {
                match message {
                    StreamMessage::Chunk(text) => {
                        request.forward_chunk(&text);
                        content.push_str(&text);
                    }
                    StreamMessage::Error(message) => {
                        return Err(ProviderError::Api {
                            status: None,
                            message,
                        });
                    }
                    StreamMessage::End => break 'stream,
                }
            }
        }

        match decoder.finish() {
            Some(StreamMessage::Chunk(text)) => {
                request.forward_chunk(&text);
                content.push_str(&text);
            }
            Some(StreamMessage::Error(message)) => {
                return Err(ProviderError::Api {
                    status: None,
                    message,
                });
            }
            Some(StreamMessage::End) | None => {}
        }

        debug!(chars = content.len(), "completion finished");
        if content.is_empty() {
            return Err(ProviderError::EmptyReply);
        }
        Ok(Reply { content })
    }
}
