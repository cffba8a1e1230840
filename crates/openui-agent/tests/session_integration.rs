#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for openui-agent sessions.
//!
//! A scripted backend replays fixed chunk sequences so the accumulator and
//! the executor can be exercised together with the built-in tools.

use async_trait::async_trait;
use openui_agent::*;
use openui_core::{
    FinishReason, ResponseChunk, ToolCall, ToolCallDelta, ToolCallStatus, ToolResult, UiGenError,
    UiGenResult,
};
use openui_tools::{ToolExecutor, ToolRegistry};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
enum Step {
    Chunk(ResponseChunk),
    Fail(&'static str),
}

struct ScriptedBackend {
    steps: Vec<Step>,
    refuse: bool,
}

impl ScriptedBackend {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps,
            refuse: false,
        })
    }

    fn refusing() -> Arc<Self> {
        Arc::new(Self {
            steps: Vec::new(),
            refuse: true,
        })
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_chat(&self, _request: &ChatRequest) -> UiGenResult<ChunkStream> {
        if self.refuse {
            let message = "OpenAI API error 401 Unauthorized: bad key";
            return Err(UiGenError::Http(message.into()));
        }
        let items: Vec<UiGenResult<ResponseChunk>> = self
            .steps
            .iter()
            .cloned()
            .map(|step| match step {
                Step::Chunk(chunk) => Ok(chunk),
                Step::Fail(msg) => Err(UiGenError::Stream(msg.to_string())),
            })
            .collect();
        Ok(Box::pin(futures_util::stream::iter(items)))
    }
}

#[derive(Default)]
struct Recorder {
    deltas: Vec<String>,
    finalized: Vec<String>,
    results: Vec<(String, bool)>,
}

impl StreamObserver for Recorder {
    fn on_text_delta(&mut self, delta: &str) {
        self.deltas.push(delta.to_string());
    }

    fn on_tool_call_finalized(&mut self, call: &ToolCall) {
        self.finalized.push(call.id.clone());
    }

    fn on_tool_result(&mut self, call: &ToolCall, result: &ToolResult) {
        self.results.push((call.id.clone(), result.success));
    }
}

fn executor() -> ToolExecutor {
    let mut registry = ToolRegistry::new();
    openui_builtins::register_builtins(&mut registry);
    ToolExecutor::new(Arc::new(registry))
}

fn request() -> ChatRequest {
    ChatRequest {
        model: "gpt-4o".into(),
        messages: vec![ChatMessage::user("build a counter")],
        temperature: 0.7,
        max_tokens: Some(8192),
        tools: Vec::new(),
    }
}

fn text(s: &str) -> Step {
    Step::Chunk(ResponseChunk::text(s))
}

fn delta(d: ToolCallDelta) -> Step {
    Step::Chunk(ResponseChunk::tool_calls(vec![d]))
}

fn start(index: usize, id: &str, name: &str, arguments: Option<&str>) -> Step {
    delta(ToolCallDelta::start(index, id, name, arguments))
}

fn finish(reason: FinishReason) -> Step {
    Step::Chunk(ResponseChunk::finish(reason))
}

// ---------------------------------------------------------------------------
// 1. Text-only responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn text_only_stream_produces_text_and_no_calls() {
    let backend = ScriptedBackend::new(vec![
        text("<p>"),
        text("Hi"),
        text("</p>"),
        finish(FinishReason::Stop),
    ]);
    let session = ToolSession::new(backend).with_executor(executor());
    let mut rec = Recorder::default();

    let outcome = session.run(&request(), &mut rec).await.unwrap();

    assert_eq!(outcome.text, "<p>Hi</p>");
    assert!(outcome.tool_calls.is_empty());
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.finish_reason, Some(FinishReason::Stop));
    assert_eq!(rec.deltas, vec!["<p>", "Hi", "</p>"]);
}

// ---------------------------------------------------------------------------
// 2. Fragmented call executed through the built-ins
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fragmented_javascript_call_is_merged_and_executed() {
    let backend = ScriptedBackend::new(vec![
        text("Computing..."),
        start(0, "call_js", "javascript", Some("{\"co")),
        delta(ToolCallDelta::arguments(0, "de\": \"return ")),
        delta(ToolCallDelta::arguments(0, "1 + 1\"}")),
        finish(FinishReason::ToolCalls),
    ]);
    let session = ToolSession::new(backend).with_executor(executor());
    let mut rec = Recorder::default();

    let outcome = session.run(&request(), &mut rec).await.unwrap();

    assert_eq!(outcome.text, "Computing...");
    assert_eq!(outcome.tool_calls.len(), 1);
    let call = &outcome.tool_calls[0];
    assert_eq!(call.str_arg("code"), Some("return 1 + 1"));
    assert_eq!(call.status, ToolCallStatus::Completed);
    assert!(call.execution_time.is_some());

    let result = &outcome.results[0];
    assert!(result.success);
    let data = result.data.as_ref().unwrap();
    assert_eq!(data["result"], json!(2));
    assert_eq!(rec.finalized, vec!["call_js"]);
    assert_eq!(rec.results, vec![("call_js".to_string(), true)]);
}

// ---------------------------------------------------------------------------
// 3. Several calls, one unknown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_index_finalizes_first_and_unknown_tool_fails() {
    let backend = ScriptedBackend::new(vec![
        start(0, "a", "html_renderer", Some(r#"{"html": "<b>x</b>"}"#)),
        start(1, "b", "weather", Some("{}")),
        finish(FinishReason::ToolCalls),
    ]);
    let session = ToolSession::new(backend).with_executor(executor());
    let mut rec = Recorder::default();

    let outcome = session.run(&request(), &mut rec).await.unwrap();

    assert_eq!(rec.finalized, vec!["a", "b"]);
    assert_eq!(outcome.results.len(), 2);
    assert!(outcome.results[0].success);
    assert_eq!(outcome.tool_calls[0].status, ToolCallStatus::Completed);

    assert!(!outcome.results[1].success);
    assert_eq!(
        outcome.results[1].error.as_deref(),
        Some("Tool 'weather' not found")
    );
    assert_eq!(outcome.tool_calls[1].status, ToolCallStatus::Failed);
    assert_eq!(
        rec.results,
        vec![("a".to_string(), true), ("b".to_string(), false)]
    );
}

// ---------------------------------------------------------------------------
// 4. Missing finish signal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn call_without_finish_signal_is_discarded() {
    let backend = ScriptedBackend::new(vec![
        text("t"),
        start(0, "a", "create_chart", Some(r#"{"type": "bar"}"#)),
    ]);
    let session = ToolSession::new(backend).with_executor(executor());
    let mut rec = Recorder::default();

    let outcome = session.run(&request(), &mut rec).await.unwrap();

    assert!(outcome.tool_calls.is_empty());
    assert!(outcome.results.is_empty());
    assert!(rec.finalized.is_empty());
}

// ---------------------------------------------------------------------------
// 5. Without an executor calls stay pending
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_without_executor_only_collects_calls() {
    let backend = ScriptedBackend::new(vec![
        start(0, "a", "javascript", Some(r#"{"code": "return 1"}"#)),
        finish(FinishReason::ToolCalls),
    ]);
    let session = ToolSession::new(backend);
    assert!(session.executor().is_none());

    let outcome = session.run(&request(), &mut ()).await.unwrap();

    assert_eq!(outcome.tool_calls.len(), 1);
    assert_eq!(outcome.tool_calls[0].status, ToolCallStatus::Pending);
    assert!(outcome.results.is_empty());
}

// ---------------------------------------------------------------------------
// 6. Transport failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transport_error_keeps_partial_output() {
    let backend = ScriptedBackend::new(vec![
        text("half"),
        start(0, "a", "html_renderer", Some(r#"{"html": "<i>"}"#)),
        finish(FinishReason::ToolCalls),
        text(" more"),
        Step::Fail("connection reset"),
        text("lost"),
    ]);
    let session = ToolSession::new(backend).with_executor(executor());
    let mut rec = Recorder::default();

    let err = session.run(&request(), &mut rec).await.unwrap_err();

    let SessionError::Stream(failure) = err else {
        panic!("expected a stream failure");
    };
    assert_eq!(failure.partial.text, "half more");
    assert_eq!(failure.partial.tool_calls.len(), 1);
    let pending = &failure.partial.tool_calls[0];
    assert_eq!(pending.status, ToolCallStatus::Pending);
    assert_eq!(rec.deltas, vec!["half", " more"]);
    assert!(rec.results.is_empty());
}

#[tokio::test]
async fn refused_request_is_an_open_error() {
    let session = ToolSession::new(ScriptedBackend::refusing());
    let err = session.run(&request(), &mut ()).await.unwrap_err();
    assert!(matches!(err, SessionError::Open(UiGenError::Http(_))));
    assert!(err.to_string().contains("401"));
}

// ---------------------------------------------------------------------------
// 7. Markdown observer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn markdown_parser_follows_the_stream() {
    let backend = ScriptedBackend::new(vec![
        text("---\nname: Counter"),
        text("\nemoji: 🔢\n---\n\n```html\n<button id=\"c\">0</button>"),
        text("\n```\n"),
        finish(FinishReason::Stop),
    ]);
    let session = ToolSession::new(backend);
    let mut parser = MarkdownParser::new();

    let outcome = session.run(&request(), &mut parser).await.unwrap();

    assert_eq!(parser.markdown(), outcome.text);
    let parsed = parser.parsed();
    assert_eq!(parsed.name(), Some("Counter"));
    assert_eq!(parsed.emoji(), Some("🔢"));
    assert_eq!(parsed.html.as_deref(), Some("<button id=\"c\">0</button>"));
}
