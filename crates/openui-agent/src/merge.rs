//! Incremental merging of streamed tool-call argument fragments.

use openui_core::Arguments;
use tracing::trace;

/// Folds argument fragments for one tool call into a JSON object.
///
/// Every fragment is appended to a pending buffer and the buffer is parsed
/// as a JSON object. When that succeeds, its keys are merged into the
/// arguments (later keys overwrite earlier ones) and the buffer is cleared.
/// Otherwise the buffer keeps growing until it parses.
///
/// Fragments that together spell one object therefore produce exactly that
/// object, and providers that send a complete object per fragment are merged
/// shallowly. A fragment sequence that never forms an object leaves the
/// arguments untouched.
#[derive(Debug, Clone, Default)]
pub struct FragmentMerger {
    arguments: Arguments,
    pending: String,
}

impl FragmentMerger {
    /// Merger with no fragments yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one fragment.
    pub fn push(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        self.pending.push_str(fragment);
        match serde_json::from_str::<serde_json::Value>(&self.pending) {
            Ok(serde_json::Value::Object(map)) => {
                self.arguments.extend(map);
                self.pending.clear();
            }
            Ok(other) => {
                trace!(kind = json_kind(&other), "Discarding non-object arguments");
                self.pending.clear();
            }
            Err(_) => {}
        }
    }

    /// Arguments merged so far.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Text received since the last successful parse.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Consumes the merger, returning the merged arguments.
    ///
    /// Whatever is still pending is dropped.
    pub fn into_arguments(self) -> Arguments {
        self.arguments
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
