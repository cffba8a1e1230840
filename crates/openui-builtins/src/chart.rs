use crate::args;
use async_trait::async_trait;
use openui_core::{Arguments, DisplayType, ToolError, ToolResult};
use openui_tools::ToolHandler;
use serde_json::Value;

/// Handler for `create_chart`: a placeholder block describing the chart
/// and echoing its data.
pub struct ChartTool;

impl ChartTool {
    /// Stateless handler.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChartTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments declared as JSON strings are decoded when they parse; anything
/// else is kept as given.
fn decode_json_arg(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => {
            serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone()))
        }
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders the placeholder.
pub fn render_chart(chart_type: &str, data: &Value, options: &Value) -> String {
    let title = options
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or("Chart");
    let points = match data {
        Value::Array(items) => items.len().to_string(),
        _ => "N/A".to_string(),
    };
    let pretty = serde_json::to_string_pretty(data).unwrap_or_default();

    format!(
        r#"<div class="chart-container">
  <h3 class="text-lg font-semibold mb-4">{title}</h3>
  <div class="chart-placeholder">
    <p>Chart Type: {chart_type}</p>
    <p>Data Points: {points}</p>
    <pre class="bg-gray-100 p-4 rounded text-sm overflow-auto">
{data}
    </pre>
  </div>
</div>

<style>
  .chart-container {{ background: white; border-radius: 8px; padding: 1.5rem; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1); }}
  .chart-placeholder {{ border: 2px dashed #d1d5db; border-radius: 8px; padding: 2rem; text-align: center; color: #6b7280; }}
</style>
"#,
        data = escape_html(&pretty),
    )
}

#[async_trait]
impl ToolHandler for ChartTool {
    async fn call(&self, args: Arguments) -> Result<ToolResult, ToolError> {
        let chart_type = args::text(&args, "type").unwrap_or_default();
        let data = decode_json_arg(args.get("data"));
        let options = decode_json_arg(args.get("options"));
        Ok(ToolResult::success(
            render_chart(&chart_type, &data, &options),
            DisplayType::Html,
        ))
    }
}
