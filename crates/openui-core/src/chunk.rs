use serde::{Deserialize, Serialize};

/// Why the model stopped producing output for a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// End of the tool-call section; finalizes any call still being assembled.
    ToolCalls,
    /// Natural end of the message.
    Stop,
    /// Output hit the token limit.
    Length,
    /// Any other provider-specific reason.
    #[serde(untagged)]
    Other(String),
}

impl FinishReason {
    /// Maps a wire string onto a reason.
    pub fn parse(reason: &str) -> Self {
        match reason {
            "tool_calls" => Self::ToolCalls,
            "stop" => Self::Stop,
            "length" => Self::Length,
            other => Self::Other(other.to_string()),
        }
    }
}

/// An incremental fragment of one tool call slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Zero-based position of the call within the response.
    pub index: usize,
    /// Call id, normally present on the first fragment only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Tool name, normally present on the first fragment only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A slice of the JSON argument document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments_fragment: Option<String>,
}

impl ToolCallDelta {
    /// Opening fragment of a call: id and name, optionally the first arguments slice.
    pub fn start(index: usize, id: &str, name: &str, arguments: Option<&str>) -> Self {
        Self {
            index,
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            arguments_fragment: arguments.map(str::to_string),
        }
    }

    /// Continuation fragment carrying only arguments text.
    pub fn arguments(index: usize, fragment: &str) -> Self {
        Self {
            index,
            arguments_fragment: Some(fragment.to_string()),
            ..Self::default()
        }
    }
}

/// One chunk delivered by the model transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseChunk {
    /// Text produced since the previous chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_delta: Option<String>,
    /// Tool call fragments carried by this chunk.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_call_deltas: Vec<ToolCallDelta>,
    /// Present on the last chunk of a choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl ResponseChunk {
    /// A chunk carrying only text.
    pub fn text(delta: impl Into<String>) -> Self {
        Self {
            text_delta: Some(delta.into()),
            ..Self::default()
        }
    }

    /// A chunk carrying tool call fragments.
    pub fn tool_calls(deltas: Vec<ToolCallDelta>) -> Self {
        Self {
            tool_call_deltas: deltas,
            ..Self::default()
        }
    }

    /// A chunk carrying only a finish reason.
    pub fn finish(reason: FinishReason) -> Self {
        Self {
            finish_reason: Some(reason),
            ..Self::default()
        }
    }

    /// Whether the chunk has nothing to contribute.
    pub fn is_empty(&self) -> bool {
        self.text_delta.is_none()
            && self.tool_call_deltas.is_empty()
            && self.finish_reason.is_none()
    }
}
