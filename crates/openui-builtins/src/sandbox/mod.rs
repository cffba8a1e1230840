//! Script sandboxes used by the `javascript` tool.
//!
//! The tool never evaluates code itself; it hands the code and a scoped
//! [`Console`] to a [`ScriptSandbox`]. Two back-ends are provided:
//!
//! - [`QuickJsSandbox`]: an embedded QuickJS engine with memory, stack and
//!   time limits, running on the blocking pool.
//! - [`NodeSandbox`]: runs the code in a `node` subprocess with a timeout.

/// Per-evaluation console capture.
pub mod console;
/// `node` subprocess back-end.
pub mod node;
/// Embedded QuickJS back-end.
pub mod quickjs;

pub use console::{Console, ConsoleCapture};
pub use node::{NodeSandbox, NodeSandboxConfig};
pub use quickjs::{QuickJsConfig, QuickJsSandbox};

use async_trait::async_trait;

/// Why a script evaluation failed.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The script raised an error; the message is the script's own.
    #[error("{0}")]
    Runtime(String),

    /// The script could not be parsed.
    #[error("SyntaxError: {0}")]
    Syntax(String),

    /// The evaluation ran past its deadline.
    #[error("execution timed out after {0}s")]
    Timeout(u64),

    /// The back-end itself could not run.
    #[error("sandbox unavailable: {0}")]
    Unavailable(String),
}

/// Capability to evaluate a script body as if it were the body of
/// `function (console) { ... }`.
///
/// The returned value is the function's return value (`null` when it
/// returns nothing). Console output goes to `console`.
#[async_trait]
pub trait ScriptSandbox: Send + Sync {
    /// Short identifier used in logs and config.
    fn name(&self) -> &str;

    /// Evaluates `code`.
    async fn evaluate(&self, code: &str, console: &Console)
        -> Result<serde_json::Value, ScriptError>;
}
