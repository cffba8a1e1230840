use crate::registry::ToolRegistry;
use futures_util::FutureExt;
use openui_core::{ToolCall, ToolCallStatus, ToolResult};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Message used when a failure carries nothing readable.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Resolves tool calls against a [`ToolRegistry`] and runs them.
///
/// `execute` never fails and never lets a handler panic escape: every
/// outcome is reported as a [`ToolResult`].
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    /// Executor dispatching into `registry`.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Registry the executor resolves names in.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Names of every tool this executor can dispatch to.
    pub fn available_tools(&self) -> Vec<String> {
        self.registry.list_names()
    }

    /// Executes one call and returns its normalized result.
    ///
    /// `metadata.execution_time` always holds the elapsed milliseconds,
    /// overwriting whatever the handler reported.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let Some(handler) = self.registry.resolve(&call.name) else {
            warn!(tool = %call.name, call_id = %call.id, "Tool not found");
            return ToolResult::failure(format!("Tool '{}' not found", call.name))
                .with_execution_time(elapsed_millis(start));
        };

        info!(tool = %call.name, call_id = %call.id, "Executing tool call");

        let outcome = AssertUnwindSafe(handler.call(call.arguments.clone()))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => normalize(result),
            Ok(Err(e)) => {
                warn!(tool = %call.name, error = %e, "Tool handler failed");
                ToolResult::failure(non_empty(e.to_string()))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!(tool = %call.name, error = %message, "Tool handler panicked");
                ToolResult::failure(message)
            }
        };

        result.with_execution_time(elapsed_millis(start))
    }

    /// Executes a call while tracking its lifecycle on the record itself.
    ///
    /// Moves the call to `Running` before invocation, then to `Completed` or
    /// `Failed`, and records the execution time and the result or error.
    pub async fn run(&self, call: &mut ToolCall) -> ToolResult {
        call.status = ToolCallStatus::Running;
        let result = self.execute(call).await;

        call.execution_time = result.metadata.execution_time;
        if result.success {
            call.status = ToolCallStatus::Completed;
            call.result = result.data.clone();
            call.error = None;
        } else {
            call.status = ToolCallStatus::Failed;
            call.result = None;
            call.error = result.error.clone();
        }
        result
    }
}

/// Enforces the envelope invariant: a failure has an error and no data.
fn normalize(mut result: ToolResult) -> ToolResult {
    if !result.success {
        result.data = None;
        if result.error.as_deref().map_or(true, str::is_empty) {
            result.error = Some(UNKNOWN_ERROR.to_string());
        }
    }
    result
}

fn non_empty(message: String) -> String {
    if message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        non_empty((*s).to_string())
    } else if let Some(s) = payload.downcast_ref::<String>() {
        non_empty(s.clone())
    } else {
        UNKNOWN_ERROR.to_string()
    }
}

fn elapsed_millis(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
