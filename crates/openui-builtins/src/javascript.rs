use crate::args;
use crate::sandbox::{ConsoleCapture, ScriptSandbox};
use async_trait::async_trait;
use openui_core::{Arguments, DisplayType, ToolError, ToolResult};
use openui_tools::ToolHandler;
use std::sync::Arc;
use tracing::debug;

/// Runs the `code` argument in a [`ScriptSandbox`] and reports the return
/// value together with everything the script logged.
pub struct JavaScriptTool {
    sandbox: Arc<dyn ScriptSandbox>,
}

impl JavaScriptTool {
    /// Tool evaluating scripts in `sandbox`.
    pub fn new(sandbox: Arc<dyn ScriptSandbox>) -> Self {
        Self { sandbox }
    }
}

fn execution_failed(message: impl std::fmt::Display) -> ToolError {
    ToolError::failed(format!("JavaScript execution failed: {message}"))
}

#[async_trait]
impl ToolHandler for JavaScriptTool {
    async fn call(&self, args: Arguments) -> Result<ToolResult, ToolError> {
        let code = args::text(&args, "code")
            .ok_or_else(|| execution_failed("missing 'code' argument"))?;
        debug!(
            sandbox = self.sandbox.name(),
            bytes = code.len(),
            "Evaluating script"
        );

        // The capture is released when it goes out of scope, including when
        // the sandbox panics.
        let capture = ConsoleCapture::acquire();
        let outcome = self.sandbox.evaluate(&code, capture.console()).await;
        let console_output = capture.finish();

        let result = outcome.map_err(execution_failed)?;
        Ok(ToolResult::success(
            serde_json::json!({
                "result": result,
                "consoleOutput": console_output,
                "success": true,
            }),
            DisplayType::Json,
        ))
    }
}
