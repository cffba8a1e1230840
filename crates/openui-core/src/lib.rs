//! Core types and error definitions for OpenUI.
//!
//! This crate provides the types shared by every OpenUI crate: the unified
//! error enum, tool call and tool result records, the declarative tool
//! schemas exposed to the model, and the chunk shape produced by a streaming
//! chat completion.
//!
//! # Main types
//!
//! - [`UiGenError`]: Unified error enum for all OpenUI subsystems.
//! - [`UiGenResult`]: Convenience alias for `Result<T, UiGenError>`.
//! - [`ToolCall`]: A model-requested tool invocation and its lifecycle.
//! - [`ToolResult`]: The uniform envelope returned by tool execution.
//! - [`ToolDefinition`] / [`ToolSchema`]: Tool declarations shown to the model.
//! - [`ResponseChunk`]: One chunk of a streaming chat completion.

/// Streaming response chunk types.
pub mod chunk;
/// Tool declarations exposed to the model.
pub mod definition;
/// Error types.
pub mod error;
/// Tool call and tool result records.
pub mod tool;

pub use chunk::{FinishReason, ResponseChunk, ToolCallDelta};
pub use definition::{ParameterSpec, ToolDefinition, ToolParameters, ToolSchema};
pub use error::{ToolError, UiGenError, UiGenResult};
pub use tool::{Arguments, DisplayType, ToolCall, ToolCallStatus, ToolResult, ToolResultMetadata};
