//! Built-in client-side tools for OpenUI.
//!
//! Provides the five tools of the default catalog, the script sandboxes used
//! by `javascript`, and the catalog itself.
//!
//! # Main entry points
//!
//! - [`register_builtins()`]: register every built-in tool, evaluating
//!   scripts with the embedded [`QuickJsSandbox`].
//! - [`register_builtins_with_sandbox()`]: same, with a caller-chosen sandbox.
//! - [`default_tool_schemas()`]: the catalog advertised to the model.

mod args;

/// Default tool catalog.
pub mod catalog;
/// Placeholder chart rendering.
pub mod chart;
/// Interactive component templates.
pub mod component;
/// HTML preview documents.
pub mod html_renderer;
/// Script execution tool.
pub mod javascript;
/// Random sample records.
pub mod sample_data;
/// Script sandboxes and console capture.
pub mod sandbox;

pub use catalog::{default_tool_schemas, enabled_definitions, BUILTIN_TOOL_NAMES};
pub use chart::ChartTool;
pub use component::ComponentTool;
pub use html_renderer::HtmlRendererTool;
pub use javascript::JavaScriptTool;
pub use sample_data::SampleDataTool;
pub use sandbox::{
    Console, ConsoleCapture, NodeSandbox, NodeSandboxConfig, QuickJsConfig, QuickJsSandbox,
    ScriptError, ScriptSandbox,
};

use openui_tools::ToolRegistry;
use std::sync::Arc;

/// Register all built-in tools, running scripts in a [`QuickJsSandbox`].
pub fn register_builtins(registry: &mut ToolRegistry) {
    register_builtins_with_sandbox(registry, Arc::new(QuickJsSandbox::new()));
}

/// Register all built-in tools, running scripts in `sandbox`.
pub fn register_builtins_with_sandbox(
    registry: &mut ToolRegistry,
    sandbox: Arc<dyn ScriptSandbox>,
) {
    registry.register("javascript", Arc::new(JavaScriptTool::new(sandbox)));
    registry.register("html_renderer", Arc::new(HtmlRendererTool::new()));
    registry.register(
        "create_interactive_component",
        Arc::new(ComponentTool::new()),
    );
    registry.register("generate_sample_data", Arc::new(SampleDataTool::new()));
    registry.register("create_chart", Arc::new(ChartTool::new()));
}
