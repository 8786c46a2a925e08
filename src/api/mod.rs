//! Wire payloads for the chat-completions API and the release tag listing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatResponseDelta {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub delta: ChatResponseDelta,
}

/// One streamed `chat.completion.chunk` event.
#[derive(Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatResponseChoice>,
}

/// One entry of a GitHub-style tag listing.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
}

/// Join a base URL and an endpoint path without doubling slashes.
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_api_url_normalizes_slashes() {
        let cases = [
            ("https://api.example.com/v1", "chat/completions"),
            ("https://api.example.com/v1/", "chat/completions"),
            ("https://api.example.com/v1///", "/chat/completions"),
        ];
        for (base, endpoint) in cases {
            assert_eq!(
                construct_api_url(base, endpoint),
                "https://api.example.com/v1/chat/completions",
                "base={base:?} endpoint={endpoint:?}"
            );
        }
    }

    #[test]
    fn request_serializes_single_user_message() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::user("prompt text")],
            stream: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "prompt text"}],
                "stream": true
            })
        );
    }

    #[test]
    fn tag_listing_ignores_extra_fields() {
        let tags: Vec<TagInfo> = serde_json::from_str(
            r#"[{"name": "v1.0.4", "zipball_url": "x", "commit": {"sha": "abc"}}, {"name": "v1.0.3"}]"#,
        )
        .unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "v1.0.4");
    }
}
