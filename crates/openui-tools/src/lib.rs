//! Tool registry and executor.
//!
//! The [`ToolRegistry`] maps tool names to [`ToolHandler`]s. The
//! [`ToolExecutor`] is the only way handlers get invoked: it resolves a
//! [`ToolCall`](openui_core::ToolCall), times the call and turns every
//! outcome, including unknown tools, handler errors and panics, into a
//! [`ToolResult`](openui_core::ToolResult).

/// Call dispatch.
pub mod executor;
/// The handler trait and closure adapter.
pub mod handler;
/// Name to handler lookup.
pub mod registry;

pub use executor::ToolExecutor;
pub use handler::{handler_fn, FnHandler, ToolHandler};
pub use registry::ToolRegistry;
