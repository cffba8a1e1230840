use super::{ChatBackend, ChunkStream};
use crate::config::{LlmProvider, ModelConfig};
use crate::request::ChatRequest;
use async_trait::async_trait;
use futures_util::StreamExt;
use openui_core::{FinishReason, ResponseChunk, ToolCallDelta, UiGenError, UiGenResult};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, trace};

/// OpenAI-compatible API backend.
///
/// Works with OpenAI, OpenRouter, Groq, Ollama, and any other provider
/// that implements the OpenAI chat completions API.
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    /// Backend with its own HTTP client.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut request = request.header("Content-Type", "application/json");
        if !self.config.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        // OpenRouter requires extra headers
        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request
                .header("HTTP-Referer", "https://github.com/wandb/openui")
                .header("X-Title", "OpenUI")
        } else {
            request
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn stream_chat(&self, request: &ChatRequest) -> UiGenResult<ChunkStream> {
        let url = self.config.chat_completions_url();
        let body = request.to_body();

        info!(
            url = %url,
            model = %request.model,
            tools = request.tools.len(),
            "Opening chat completion stream"
        );

        let resp = self
            .add_provider_headers(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| UiGenError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(UiGenError::Http(format!(
                "OpenAI API error {status}: {error_body}"
            )));
        }

        let (tx, rx) = mpsc::channel::<UiGenResult<ResponseChunk>>(256);
        let mut byte_stream = resp.bytes_stream();

        tokio::spawn(async move {
            let mut lines = LineBuffer::default();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx
                            .send(Err(UiGenError::Stream(format!("Stream read error: {e}"))))
                            .await;
                        return;
                    }
                };

                for line in lines.push(&bytes) {
                    match parse_sse_line(&line) {
                        SseLine::Chunk(chunk) => {
                            if tx.send(Ok(chunk)).await.is_err() {
                                debug!("Stream consumer dropped; stopping reader");
                                return;
                            }
                        }
                        SseLine::Done => {
                            trace!("Received [DONE]");
                            return;
                        }
                        SseLine::Skip => {}
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

/// Splits a byte stream into trimmed lines, buffering partial ones.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line).trim().to_string());
        }
        lines
    }
}

/// Meaning of one line of a server-sent event stream.
#[derive(Debug, PartialEq)]
enum SseLine {
    Chunk(ResponseChunk),
    Done,
    Skip,
}

fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() || line.starts_with(':') {
        return SseLine::Skip;
    }
    let Some(data) = line.strip_prefix("data:").map(str::trim_start) else {
        return SseLine::Skip;
    };
    if data == "[DONE]" {
        return SseLine::Done;
    }
    let event: serde_json::Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            trace!(error = %e, "Skipping unparsable stream event");
            return SseLine::Skip;
        }
    };
    let chunk = chunk_from_event(&event);
    if chunk.is_empty() {
        SseLine::Skip
    } else {
        SseLine::Chunk(chunk)
    }
}

/// Reads the first choice of a chat-completion chunk.
pub fn chunk_from_event(event: &serde_json::Value) -> ResponseChunk {
    let choice = &event["choices"][0];
    let delta = &choice["delta"];

    let text_delta = delta["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let tool_call_deltas = delta["tool_calls"]
        .as_array()
        .map(|calls| {
            calls
                .iter()
                .map(|tc| ToolCallDelta {
                    index: tc["index"].as_u64().unwrap_or(0) as usize,
                    id: tc["id"].as_str().map(str::to_string),
                    name: tc["function"]["name"].as_str().map(str::to_string),
                    arguments_fragment: tc["function"]["arguments"]
                        .as_str()
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = choice["finish_reason"].as_str().map(FinishReason::parse);

    ResponseChunk {
        text_delta,
        tool_call_deltas,
        finish_reason,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_buffer_keeps_partial_lines() {
        let mut buf = LineBuffer::default();
        assert!(buf.push(b"data: {\"a\"").is_empty());
        let lines = buf.push(b":1}\r\n\ndata: [DO");
        assert_eq!(lines, vec!["data: {\"a\":1}".to_string(), String::new()]);
        assert_eq!(buf.push(b"NE]\n"), vec!["data: [DONE]".to_string()]);
    }

    #[test]
    fn test_line_buffer_multibyte_split() {
        let mut buf = LineBuffer::default();
        let bytes = "data: 🎉\n".as_bytes();
        assert!(buf.push(&bytes[..8]).is_empty());
        assert_eq!(buf.push(&bytes[8..]), vec!["data: 🎉".to_string()]);
    }

    #[test]
    fn test_parse_sse_line_kinds() {
        assert_eq!(parse_sse_line(""), SseLine::Skip);
        assert_eq!(parse_sse_line(": keep-alive"), SseLine::Skip);
        assert_eq!(parse_sse_line("event: ping"), SseLine::Skip);
        assert_eq!(parse_sse_line("data: not json"), SseLine::Skip);
        assert_eq!(parse_sse_line("data: [DONE]"), SseLine::Done);
        assert_eq!(
            parse_sse_line(r#"data: {"choices":[{"delta":{"content":"hi"}}]}"#),
            SseLine::Chunk(ResponseChunk::text("hi"))
        );
    }

    #[test]
    fn test_chunk_from_tool_call_event() {
        let event = json!({
            "choices": [{
                "delta": {
                    "tool_calls": [{
                        "index": 1,
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "javascript", "arguments": "{\"co"}
                    }]
                },
                "finish_reason": null
            }]
        });
        let chunk = chunk_from_event(&event);
        assert!(chunk.text_delta.is_none());
        let expected = ToolCallDelta::start(1, "call_9", "javascript", Some("{\"co"));
        assert_eq!(chunk.tool_call_deltas, vec![expected]);
        assert!(chunk.finish_reason.is_none());
    }

    #[test]
    fn test_chunk_from_finish_event() {
        let event = json!({"choices": [{"delta": {}, "finish_reason": "tool_calls"}]});
        let chunk = chunk_from_event(&event);
        assert_eq!(chunk, ResponseChunk::finish(FinishReason::ToolCalls));
    }

    #[test]
    fn test_usage_only_event_is_empty() {
        let event = json!({"choices": [], "usage": {"total_tokens": 10}});
        assert!(chunk_from_event(&event).is_empty());
    }
}
