//! Default tool catalog advertised to the model.

use openui_core::{ToolDefinition, ToolSchema};

/// Name of every tool this crate provides a handler for.
pub const BUILTIN_TOOL_NAMES: [&str; 5] = [
    "create_interactive_component",
    "html_renderer",
    "generate_sample_data",
    "create_chart",
    "javascript",
];

/// The catalog groups shown to the user and sent to the model.
pub fn default_tool_schemas() -> Vec<ToolSchema> {
    vec![
        ToolSchema {
            name: "UI Components".to_string(),
            schema: vec![
                ToolDefinition::new(
                    "create_interactive_component",
                    "Creates an interactive UI component with JavaScript functionality",
                )
                .required(
                    "componentType",
                    "string",
                    "Type of component (form, table, modal, chart, dashboard, etc.)",
                )
                .required(
                    "features",
                    "string",
                    "Comma-separated list of features to include (validation, search, sorting, pagination, animation, etc.)",
                )
                .optional(
                    "styling",
                    "string",
                    "Design style preference (modern, minimal, colorful, professional, etc.)",
                ),
                ToolDefinition::new(
                    "html_renderer",
                    "Renders HTML content with optional CSS styling as a live preview",
                )
                .required("html", "string", "The HTML content to render")
                .optional("css", "string", "Optional CSS styles to apply"),
            ],
        },
        ToolSchema {
            name: "Data & Analytics".to_string(),
            schema: vec![
                ToolDefinition::new(
                    "generate_sample_data",
                    "Generates realistic sample data for components like tables, lists, or cards",
                )
                .required(
                    "dataType",
                    "string",
                    "Type of data (users, products, posts, analytics, companies, events, etc.)",
                )
                .required("count", "string", "Number of items to generate")
                .optional(
                    "fields",
                    "string",
                    "Comma-separated list of specific fields to include (optional)",
                ),
                ToolDefinition::new(
                    "create_chart",
                    "Creates interactive charts and data visualizations",
                )
                .required(
                    "type",
                    "string",
                    "Chart type (bar, line, pie, scatter, area, etc.)",
                )
                .required("data", "string", "Chart data as JSON string or data source")
                .optional(
                    "options",
                    "string",
                    "Chart configuration options as JSON string (optional)",
                ),
            ],
        },
        ToolSchema {
            name: "Development Tools".to_string(),
            schema: vec![ToolDefinition::new(
                "javascript",
                "Executes JavaScript code in a safe environment and returns the result",
            )
            .required(
                "code",
                "string",
                "The JavaScript code to execute. Use return statement to return a value.",
            )],
        },
    ]
}

/// Definitions from `groups` whose name is in `allowed`; an empty
/// `allowed` list keeps every definition.
pub fn enabled_definitions<'a>(
    groups: &'a [ToolSchema],
    allowed: &[String],
) -> Vec<&'a ToolDefinition> {
    ToolSchema::flatten(groups)
        .into_iter()
        .filter(|def| allowed.is_empty() || allowed.iter().any(|a| a == &def.name))
        .collect()
}
