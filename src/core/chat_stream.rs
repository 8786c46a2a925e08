//! Decoding of server-sent events from the chat-completions endpoint.

use memchr::memchr;
use tracing::warn;

use crate::api::ChatResponse;

const MAX_ERROR_SUMMARY_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    Chunk(String),
    Error(String),
    End,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

/// Interpret one SSE line. Comments, keep-alives and empty deltas yield
/// `None`.
pub fn decode_sse_line(line: &str) -> Option<StreamMessage> {
    let payload = extract_data_payload(line.trim())?;

    if payload == "[DONE]" {
        return Some(StreamMessage::End);
    }

    match serde_json::from_str::<ChatResponse>(payload) {
        Ok(response) => response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(StreamMessage::Chunk),
        Err(_) => {
            if payload.trim().is_empty() {
                return None;
            }
            Some(StreamMessage::Error(summarize_api_error(payload)))
        }
    }
}

/// Splits a byte stream into lines and decodes each one.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamMessage> {
        self.buffer.extend_from_slice(bytes);
        let mut messages = Vec::new();

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            match std::str::from_utf8(&self.buffer[..newline_pos]) {
                Ok(line) => messages.extend(decode_sse_line(line)),
                Err(e) => warn!("invalid UTF-8 in stream: {e}"),
            }
            self.buffer.drain(..=newline_pos);
        }

        messages
    }

    /// Decode whatever is left once the body ends without a final newline.
    pub fn finish(&mut self) -> Option<StreamMessage> {
        let rest = std::mem::take(&mut self.buffer);
        std::str::from_utf8(&rest).ok().and_then(decode_sse_line)
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| collapse_whitespace(&text))
        .filter(|text| !text.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One-line description of an error body, suitable for display inside a
/// chat turn.
pub fn summarize_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    let summary = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json_value) => {
            extract_error_summary(&json_value).unwrap_or_else(|| json_value.to_string())
        }
        Err(_) => collapse_whitespace(trimmed),
    };

    if summary.chars().count() > MAX_ERROR_SUMMARY_CHARS {
        let truncated: String = summary.chars().take(MAX_ERROR_SUMMARY_CHARS).collect();
        format!("{truncated}…")
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_sse_line_handles_spacing_variants() {
        let variants = [
            (
                r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#,
                "Hello",
                "data: [DONE]",
            ),
            (
                r#"data:{"choices":[{"delta":{"content":"World"}}]}"#,
                "World",
                "data:[DONE]",
            ),
        ];

        for (chunk_line, expected_chunk, done_line) in variants {
            assert_eq!(
                decode_sse_line(chunk_line),
                Some(StreamMessage::Chunk(expected_chunk.to_string()))
            );
            assert_eq!(decode_sse_line(done_line), Some(StreamMessage::End));
        }
    }

    #[test]
    fn decode_sse_line_skips_non_content_lines() {
        assert_eq!(decode_sse_line(": keep-alive"), None);
        assert_eq!(decode_sse_line(""), None);
        assert_eq!(decode_sse_line("event: message"), None);
        assert_eq!(
            decode_sse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
        assert_eq!(decode_sse_line(r#"data: {"choices":[]}"#), None);
    }

    #[test]
    fn decode_sse_line_routes_stream_errors() {
        let error_line = r#"data: {"error":{"message":"internal server error"}}"#;
        assert_eq!(
            decode_sse_line(error_line),
            Some(StreamMessage::Error("internal server error".to_string()))
        );
    }

    #[test]
    fn decoder_reassembles_lines_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let mut messages = Vec::new();

        messages.extend(decoder.feed(b"data: {\"choices\":[{\"delta\":{\"con"));
        assert!(messages.is_empty());
        messages.extend(decoder.feed(b"tent\":\"Hel\"}}]}\n\ndata: {\"choices\":[{\"delta\""));
        messages.extend(decoder.feed(b":{\"content\":\"lo\"}}]}\n"));
        messages.extend(decoder.feed(b"data: [DONE]\n"));

        assert_eq!(
            messages,
            vec![
                StreamMessage::Chunk("Hel".to_string()),
                StreamMessage::Chunk("lo".to_string()),
                StreamMessage::End,
            ]
        );
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn decoder_skips_invalid_utf8_lines() {
        let mut decoder = SseDecoder::new();
        let mut bytes = vec![0xff, 0xfe, b'\n'];
        bytes.extend_from_slice(b"data: [DONE]\n");
        assert_eq!(decoder.feed(&bytes), vec![StreamMessage::End]);
    }

    #[test]
    fn decoder_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: [DONE]").is_empty());
        assert_eq!(decoder.finish(), Some(StreamMessage::End));
    }

    #[test]
    fn summarize_api_error_prefers_message_fields() {
        let raw = r#"{"error":{"message":"model   overloaded","type":"invalid_request_error"}}"#;
        assert_eq!(summarize_api_error(raw), "model overloaded");
        assert_eq!(summarize_api_error(r#"{"error":"quota"}"#), "quota");
        assert_eq!(summarize_api_error(r#"{"message":"nope"}"#), "nope");
    }

    #[test]
    fn summarize_api_error_falls_back_to_body_text() {
        assert_eq!(
            summarize_api_error(r#"{"status":"failed"}"#),
            r#"{"status":"failed"}"#
        );
        assert_eq!(
            summarize_api_error("<html>\n  bad gateway\n</html>"),
            "<html> bad gateway </html>"
        );
        assert_eq!(summarize_api_error("   "), "empty response body");
    }

    #[test]
    fn summarize_api_error_truncates_long_bodies() {
        let long = "x".repeat(500);
        let summary = summarize_api_error(&long);
        assert_eq!(summary.chars().count(), MAX_ERROR_SUMMARY_CHARS + 1);
        assert!(summary.ends_with('…'));
    }
}
