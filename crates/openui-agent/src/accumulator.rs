//! Folds a chunked model response into output text and finalized tool calls.

use crate::merge::FragmentMerger;
use futures_util::{Stream, StreamExt};
use openui_core::{
    Arguments, FinishReason, ResponseChunk, ToolCall, ToolCallDelta, ToolResult, UiGenError,
    UiGenResult,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Receives session events as they happen.
///
/// Both methods run synchronously on the consuming task, in arrival order.
pub trait StreamObserver {
    /// Called once per text delta with just that delta.
    fn on_text_delta(&mut self, _delta: &str) {}

    /// Called when a tool call has been finalized.
    fn on_tool_call_finalized(&mut self, _call: &ToolCall) {}

    /// Called after a session executed a finalized call.
    fn on_tool_result(&mut self, _call: &ToolCall, _result: &ToolResult) {}
}

/// Observer that ignores everything.
impl StreamObserver for () {}

/// A tool call whose fragments are still arriving.
#[derive(Debug, Clone)]
pub struct PartialToolCall {
    index: usize,
    call: ToolCall,
    merger: FragmentMerger,
}

impl PartialToolCall {
    fn new(index: usize) -> Self {
        Self {
            index,
            call: ToolCall::new(String::new(), String::new(), Arguments::new()),
            merger: FragmentMerger::new(),
        }
    }

    /// Stream slot this call occupies.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Call id, empty until a fragment supplies one.
    pub fn id(&self) -> &str {
        &self.call.id
    }

    /// Tool name, empty until a fragment supplies one.
    pub fn name(&self) -> &str {
        &self.call.name
    }

    /// Arguments merged so far.
    pub fn arguments(&self) -> &Arguments {
        self.merger.arguments()
    }

    fn apply(&mut self, delta: ToolCallDelta) {
        if self.call.id.is_empty() {
            if let Some(id) = delta.id.filter(|id| !id.is_empty()) {
                self.call.id = id;
            }
        }
        if self.call.name.is_empty() {
            if let Some(name) = delta.name.filter(|name| !name.is_empty()) {
                self.call.name = name;
            }
        }
        if let Some(fragment) = delta.arguments_fragment {
            self.merger.push(&fragment);
        }
    }

    fn into_call(self) -> ToolCall {
        let mut call = self.call;
        call.arguments = self.merger.into_arguments();
        if call.id.is_empty() {
            call.id = format!("call_{}", Uuid::new_v4().simple());
        }
        call
    }
}

/// Everything a session produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamOutput {
    /// Concatenation of every text delta.
    pub text: String,
    /// Finalized tool calls in completion order.
    pub tool_calls: Vec<ToolCall>,
    /// Last finish reason seen, if any.
    pub finish_reason: Option<FinishReason>,
}

/// A transport failure, together with what had been produced before it.
#[derive(Debug, thiserror::Error)]
#[error("stream aborted: {source}")]
pub struct StreamFailure {
    /// The transport error.
    pub source: UiGenError,
    /// Text and finalized calls accumulated before the failure.
    pub partial: StreamOutput,
}

/// Per-request session state.
///
/// Holds the output text, at most one in-progress call and the finalized
/// calls. Chunks must be fed in arrival order from a single consumer.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    output_text: String,
    in_progress: Option<PartialToolCall>,
    finalized: Vec<ToolCall>,
    finish_reason: Option<FinishReason>,
}

impl StreamAccumulator {
    /// Accumulator for a new request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one chunk: text first, then tool-call fragments, then the
    /// finish signal.
    pub fn process_chunk(&mut self, chunk: ResponseChunk, observer: &mut dyn StreamObserver) {
        if let Some(delta) = chunk.text_delta {
            if !delta.is_empty() {
                self.output_text.push_str(&delta);
                observer.on_text_delta(&delta);
            }
        }

        for delta in chunk.tool_call_deltas {
            let continues = self
                .in_progress
                .as_ref()
                .is_some_and(|current| current.index == delta.index);
            if !continues {
                self.finalize_in_progress(observer);
                debug!(index = delta.index, "Tool call slot opened");
                self.in_progress = Some(PartialToolCall::new(delta.index));
            }
            if let Some(current) = self.in_progress.as_mut() {
                current.apply(delta);
            }
        }

        if let Some(reason) = chunk.finish_reason {
            if reason == FinishReason::ToolCalls {
                self.finalize_in_progress(observer);
            }
            self.finish_reason = Some(reason);
        }
    }

    fn finalize_in_progress(&mut self, observer: &mut dyn StreamObserver) {
        if let Some(partial) = self.in_progress.take() {
            let call = partial.into_call();
            debug!(id = %call.id, tool = %call.name, "Tool call finalized");
            observer.on_tool_call_finalized(&call);
            self.finalized.push(call);
        }
    }

    /// Text accumulated so far.
    pub fn output_text(&self) -> &str {
        &self.output_text
    }

    /// The call currently being assembled.
    pub fn in_progress(&self) -> Option<&PartialToolCall> {
        self.in_progress.as_ref()
    }

    /// Finalized calls in completion order.
    pub fn finalized(&self) -> &[ToolCall] {
        &self.finalized
    }

    /// Ends the session. A call still in progress is discarded.
    pub fn finish(self) -> StreamOutput {
        if let Some(partial) = &self.in_progress {
            warn!(
                index = partial.index,
                id = %partial.call.id,
                tool = %partial.call.name,
                "Stream ended before tool call was finalized; discarding it"
            );
        }
        StreamOutput {
            text: self.output_text,
            tool_calls: self.finalized,
            finish_reason: self.finish_reason,
        }
    }
}

/// Drains `stream` into a fresh accumulator.
///
/// Returns on stream exhaustion. A transport error aborts consumption and
/// is returned together with the partial output.
pub async fn consume_stream<S>(
    stream: S,
    observer: &mut dyn StreamObserver,
) -> Result<StreamOutput, StreamFailure>
where
    S: Stream<Item = UiGenResult<ResponseChunk>>,
{
    futures_util::pin_mut!(stream);
    let mut acc = StreamAccumulator::new();
    let mut chunks = 0usize;

    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                chunks += 1;
                acc.process_chunk(chunk, observer);
            }
            Err(source) => {
                error!(error = %source, chunks, "Response stream failed");
                return Err(StreamFailure {
                    source,
                    partial: acc.finish(),
                });
            }
        }
    }

    let output = acc.finish();
    info!(
        chunks,
        text_len = output.text.len(),
        tool_calls = output.tool_calls.len(),
        "Response stream complete"
    );
    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use openui_core::ToolCallStatus;

    #[derive(Default)]
    struct Recorder {
        deltas: Vec<String>,
        finalized: Vec<String>,
    }

    impl StreamObserver for Recorder {
        fn on_text_delta(&mut self, delta: &str) {
            self.deltas.push(delta.to_string());
        }

        fn on_tool_call_finalized(&mut self, call: &ToolCall) {
            self.finalized.push(call.id.clone());
        }
    }

    #[test]
    fn test_text_deltas_concatenate() {
        let mut acc = StreamAccumulator::new();
        let mut rec = Recorder::default();
        for part in ["<div>", "hi", "</div>"] {
            acc.process_chunk(ResponseChunk::text(part), &mut rec);
        }
        assert_eq!(acc.output_text(), "<div>hi</div>");
        assert_eq!(rec.deltas, vec!["<div>", "hi", "</div>"]);
    }

    #[test]
    fn test_fragments_merge_and_finalize_on_finish() {
        let mut acc = StreamAccumulator::new();
        let mut rec = Recorder::default();
        let start = ToolCallDelta::start(0, "c1", "javascript", Some(r#"{"code":"#));
        acc.process_chunk(ResponseChunk::tool_calls(vec![start]), &mut rec);
        acc.process_chunk(
            ResponseChunk::tool_calls(vec![ToolCallDelta::arguments(0, r#""1+1"}"#)]),
            &mut rec,
        );
        assert!(acc.finalized().is_empty());
        acc.process_chunk(ResponseChunk::finish(FinishReason::ToolCalls), &mut rec);

        let call = &acc.finalized()[0];
        assert_eq!(call.id, "c1");
        assert_eq!(call.name, "javascript");
        assert_eq!(call.str_arg("code"), Some("1+1"));
        assert_eq!(call.status, ToolCallStatus::Pending);
        assert!(acc.in_progress().is_none());
        assert_eq!(rec.finalized, vec!["c1"]);
    }

    #[test]
    fn test_new_index_finalizes_previous() {
        let mut acc = StreamAccumulator::new();
        let first = ToolCallDelta::start(0, "a", "html_renderer", Some("{}"));
        acc.process_chunk(ResponseChunk::tool_calls(vec![first]), &mut ());
        acc.process_chunk(
            ResponseChunk::tool_calls(vec![ToolCallDelta::start(1, "b", "javascript", None)]),
            &mut (),
        );
        assert_eq!(acc.finalized().len(), 1);
        assert_eq!(acc.finalized()[0].id, "a");
        let current = acc.in_progress().unwrap();
        assert_eq!(current.index(), 1);
        assert_eq!(current.id(), "b");
    }

    #[test]
    fn test_id_may_arrive_late() {
        let mut acc = StreamAccumulator::new();
        acc.process_chunk(
            ResponseChunk::tool_calls(vec![ToolCallDelta::arguments(0, "{")]),
            &mut (),
        );
        acc.process_chunk(
            ResponseChunk::tool_calls(vec![ToolCallDelta {
                index: 0,
                id: Some("late".into()),
                name: Some("create_chart".into()),
                arguments_fragment: Some("}".into()),
            }]),
            &mut (),
        );
        acc.process_chunk(
            ResponseChunk::tool_calls(vec![ToolCallDelta {
                index: 0,
                id: Some("ignored".into()),
                ..ToolCallDelta::default()
            }]),
            &mut (),
        );
        acc.process_chunk(ResponseChunk::finish(FinishReason::ToolCalls), &mut ());
        assert_eq!(acc.finalized()[0].id, "late");
        assert_eq!(acc.finalized()[0].name, "create_chart");
    }

    #[test]
    fn test_missing_id_gets_generated() {
        let mut acc = StreamAccumulator::new();
        acc.process_chunk(
            ResponseChunk::tool_calls(vec![ToolCallDelta::arguments(0, "{}")]),
            &mut (),
        );
        acc.process_chunk(ResponseChunk::finish(FinishReason::ToolCalls), &mut ());
        assert!(acc.finalized()[0].id.starts_with("call_"));
    }

    #[test]
    fn test_finish_without_signal_discards_in_progress() {
        let mut acc = StreamAccumulator::new();
        acc.process_chunk(ResponseChunk::text("t"), &mut ());
        let start = ToolCallDelta::start(0, "x", "javascript", Some(r#"{"code": "1""#));
        acc.process_chunk(ResponseChunk::tool_calls(vec![start]), &mut ());
        acc.process_chunk(ResponseChunk::finish(FinishReason::Stop), &mut ());
        let out = acc.finish();
        assert_eq!(out.text, "t");
        assert!(out.tool_calls.is_empty());
        assert_eq!(out.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_unparsed_arguments_still_finalize() {
        let mut acc = StreamAccumulator::new();
        let start = ToolCallDelta::start(0, "x", "javascript", Some(r#"{"code": "#));
        acc.process_chunk(ResponseChunk::tool_calls(vec![start]), &mut ());
        acc.process_chunk(ResponseChunk::finish(FinishReason::ToolCalls), &mut ());
        let out = acc.finish();
        assert_eq!(out.tool_calls.len(), 1);
        assert!(out.tool_calls[0].arguments.is_empty());
    }

    #[tokio::test]
    async fn test_consume_stream_returns_partial_on_error() {
        let first = ToolCallDelta::start(0, "a", "x", Some("{}"));
        let second = ToolCallDelta::start(1, "b", "y", None);
        let items: Vec<UiGenResult<ResponseChunk>> = vec![
            Ok(ResponseChunk::text("partial")),
            Ok(ResponseChunk::tool_calls(vec![first])),
            Ok(ResponseChunk::tool_calls(vec![second])),
            Err(UiGenError::Stream("connection reset".into())),
            Ok(ResponseChunk::text("never seen")),
        ];
        let mut rec = Recorder::default();
        let failure = consume_stream(futures_util::stream::iter(items), &mut rec)
            .await
            .unwrap_err();

        assert_eq!(failure.source.to_string(), "Stream error: connection reset");
        assert_eq!(failure.partial.text, "partial");
        assert_eq!(failure.partial.tool_calls.len(), 1);
        assert_eq!(failure.partial.tool_calls[0].id, "a");
        assert_eq!(rec.deltas, vec!["partial"]);
        assert_eq!(rec.finalized, vec!["a"]);
    }
}
