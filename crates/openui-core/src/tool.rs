use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tool arguments: a JSON object keyed by parameter name.
pub type Arguments = serde_json::Map<String, serde_json::Value>;

/// Lifecycle of a [`ToolCall`].
///
/// `Pending` on creation by the stream accumulator, `Running` once the
/// executor begins invocation, then one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallStatus {
    /// Assembled (or being assembled) but not yet executed.
    Pending,
    /// The executor has started the handler.
    Running,
    /// The handler finished and reported success.
    Completed,
    /// The tool was unknown, the handler failed, or it reported failure.
    Failed,
}

impl ToolCallStatus {
    /// Whether the call reached a final state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A model-requested tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    /// Identifier assigned by the model transport; unique within a session.
    pub id: String,
    /// Name of the tool to invoke. Empty if the stream never supplied one.
    pub name: String,
    /// Merged JSON arguments.
    #[serde(default)]
    pub arguments: Arguments,
    /// Payload of a successful execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Message of a failed execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Current lifecycle state.
    pub status: ToolCallStatus,
    /// Creation time. Never mutated after construction.
    pub timestamp: DateTime<Utc>,
    /// Wall-clock milliseconds spent executing, set once execution ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,
}

impl ToolCall {
    /// Creates a pending call stamped with the current time.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
            result: None,
            error: None,
            status: ToolCallStatus::Pending,
            timestamp: Utc::now(),
            execution_time: None,
        }
    }

    /// Builds a pending call from a JSON value, keeping only object arguments.
    ///
    /// Non-object values yield empty arguments.
    pub fn from_value(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            _ => Arguments::new(),
        };
        Self::new(id, name, arguments)
    }

    /// Returns a string argument, if present and a string.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(serde_json::Value::as_str)
    }
}

/// How a caller should render [`ToolResult::data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    /// Plain text.
    Text,
    /// An HTML fragment or document.
    Html,
    /// An image reference.
    Image,
    /// Structured JSON.
    Json,
    /// Content meant for an embedded frame.
    Iframe,
}

impl DisplayType {
    /// MIME type conventionally paired with this display type.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Html | Self::Iframe => "text/html",
            Self::Image => "image/png",
            Self::Json => "application/json",
        }
    }
}

/// Rendering and timing hints attached to a [`ToolResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultMetadata {
    /// MIME type of `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Rendering hint for `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<DisplayType>,
    /// Milliseconds from invocation start to resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,
}

/// The uniform envelope produced by tool execution.
///
/// A failed result never carries `data` and always carries `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Whether the tool succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rendering and timing hints.
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

impl ToolResult {
    /// Creates a successful result carrying `data`.
    pub fn success(data: impl Into<serde_json::Value>, display_type: DisplayType) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
            metadata: ToolResultMetadata {
                content_type: Some(display_type.content_type().to_string()),
                display_type: Some(display_type),
                execution_time: None,
            },
        }
    }

    /// Creates a successful result with no payload.
    pub fn empty(display_type: DisplayType) -> Self {
        Self {
            data: None,
            ..Self::success(serde_json::Value::Null, display_type)
        }
    }

    /// Creates a failed result rendered as text.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            metadata: ToolResultMetadata {
                content_type: Some(DisplayType::Text.content_type().to_string()),
                display_type: Some(DisplayType::Text),
                execution_time: None,
            },
        }
    }

    /// Sets the execution time, replacing any earlier value.
    pub fn with_execution_time(mut self, millis: u64) -> Self {
        self.metadata.execution_time = Some(millis);
        self
    }

    /// The rendering hint, defaulting to text.
    pub fn display_type(&self) -> DisplayType {
        self.metadata.display_type.unwrap_or(DisplayType::Text)
    }
}
