use crate::accumulator::{consume_stream, StreamFailure, StreamObserver};
use crate::backends::ChatBackend;
use crate::request::ChatRequest;
use futures_util::future::join_all;
use openui_core::{FinishReason, ToolCall, ToolResult, UiGenError};
use openui_tools::ToolExecutor;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one completed request.
#[derive(Debug, Clone, Default)]
pub struct SessionOutcome {
    /// Full response text.
    pub text: String,
    /// Finalized calls. Executed calls carry their final status.
    pub tool_calls: Vec<ToolCall>,
    /// One result per executed call, in the same order. Empty when the
    /// session has no executor.
    pub results: Vec<ToolResult>,
    /// Why the model stopped, when it said so.
    pub finish_reason: Option<FinishReason>,
}

/// Why a session produced no outcome.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend refused or failed to open the stream.
    #[error("failed to open completion stream: {0}")]
    Open(#[source] UiGenError),

    /// The stream broke after it started. Carries the partial output.
    #[error(transparent)]
    Stream(#[from] StreamFailure),
}

/// Drives one streaming request end to end.
///
/// Consumes the backend's chunks into a fresh accumulator, then, when an
/// executor is attached, runs every finalized call through it.
pub struct ToolSession {
    backend: Arc<dyn ChatBackend>,
    executor: Option<ToolExecutor>,
}

impl ToolSession {
    /// Session that only streams; finalized calls stay pending.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            executor: None,
        }
    }

    /// Enables execution of finalized calls.
    pub fn with_executor(mut self, executor: ToolExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// The attached executor, if any.
    pub fn executor(&self) -> Option<&ToolExecutor> {
        self.executor.as_ref()
    }

    /// Streams `request` to completion, reporting progress to `observer`,
    /// then executes the finalized calls concurrently.
    pub async fn run(
        &self,
        request: &ChatRequest,
        observer: &mut dyn StreamObserver,
    ) -> Result<SessionOutcome, SessionError> {
        let stream = self
            .backend
            .stream_chat(request)
            .await
            .map_err(SessionError::Open)?;

        let output = consume_stream(stream, observer).await?;
        let mut tool_calls = output.tool_calls;

        let results = match &self.executor {
            Some(executor) if !tool_calls.is_empty() => {
                info!(
                    backend = self.backend.name(),
                    count = tool_calls.len(),
                    "Executing finalized tool calls"
                );
                let results = join_all(tool_calls.iter_mut().map(|call| executor.run(call))).await;
                for (call, result) in tool_calls.iter().zip(&results) {
                    if !result.success {
                        warn!(
                            tool = %call.name,
                            call_id = %call.id,
                            error = ?result.error,
                            "Tool call failed"
                        );
                    }
                    observer.on_tool_result(call, result);
                }
                results
            }
            _ => Vec::new(),
        };

        Ok(SessionOutcome {
            text: output.text,
            tool_calls,
            results,
            finish_reason: output.finish_reason,
        })
    }
}
