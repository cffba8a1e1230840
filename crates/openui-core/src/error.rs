use thiserror::Error;

/// A convenience `Result` alias using [`UiGenError`].
pub type UiGenResult<T> = Result<T, UiGenError>;

/// Top-level error type for OpenUI.
///
/// Each variant corresponds to a subsystem that can produce errors. Tool
/// failures never surface through this type at the executor boundary; they
/// are converted into failed [`ToolResult`](crate::ToolResult) values.
#[derive(Error, Debug)]
pub enum UiGenError {
    /// An error from an outbound HTTP request to the model backend.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response stream broke off or delivered something unreadable.
    #[error("Stream error: {0}")]
    Stream(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error raised while preparing or dispatching a tool.
    #[error("Tool error: {0}")]
    Tool(String),

    /// An error from a script sandbox back-end.
    #[error("Sandbox error: {0}")]
    Sandbox(String),

    /// An error while parsing generated markdown.
    #[error("Markdown error: {0}")]
    Markdown(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure raised by a tool handler.
///
/// The `Display` output is the exact message placed in
/// [`ToolResult::error`](crate::ToolResult::error).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The handler ran and failed.
    #[error("{0}")]
    Failed(String),

    /// The handler rejected its arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// Creates a [`ToolError::Failed`] from any message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<UiGenError> for ToolError {
    fn from(err: UiGenError) -> Self {
        Self::Failed(err.to_string())
    }
}
