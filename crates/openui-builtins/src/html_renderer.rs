use crate::args;
use async_trait::async_trait;
use openui_core::{Arguments, DisplayType, ToolError, ToolResult};
use openui_tools::ToolHandler;

/// Wraps an HTML fragment (and optional CSS) into a standalone preview
/// document. Never fails.
pub struct HtmlRendererTool;

impl HtmlRendererTool {
    /// Stateless handler.
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlRendererTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the preview document. `html` is embedded verbatim.
pub fn render_document(html: &str, css: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }}
    {css}
  </style>
</head>
<body>
  {html}
</body>
</html>
"#,
        css = css.unwrap_or_default(),
    )
}

#[async_trait]
impl ToolHandler for HtmlRendererTool {
    async fn call(&self, args: Arguments) -> Result<ToolResult, ToolError> {
        let html = args::text(&args, "html").unwrap_or_default();
        let css = args::text(&args, "css");
        let document = render_document(&html, css.as_deref());
        Ok(ToolResult::success(document, DisplayType::Html))
    }
}
