use crate::config::{OpenUiConfig, API_KEY_ENV};
use anyhow::Context;
use base64::Engine;
use openui_agent::{
    backends, build_convert_request, build_generate_request, fix_html, parse_markdown, Action,
    ChatRequest, GenerateOptions, MarkdownParser, ModelConfig, StreamObserver, ToolSession,
};
use openui_core::{ToolCall, ToolDefinition, ToolResult};
use openui_tools::ToolExecutor;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Echoes the stream to the terminal while parsing it.
pub struct TerminalObserver<W: Write> {
    out: W,
    parser: MarkdownParser,
}

impl<W: Write> TerminalObserver<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            parser: MarkdownParser::new(),
        }
    }

    pub fn parser(&self) -> &MarkdownParser {
        &self.parser
    }
}

impl<W: Write> StreamObserver for TerminalObserver<W> {
    fn on_text_delta(&mut self, delta: &str) {
        self.parser.push(delta);
        let _ = self.out.write_all(delta.as_bytes());
        let _ = self.out.flush();
    }

    fn on_tool_call_finalized(&mut self, call: &ToolCall) {
        let args = serde_json::Value::Object(call.arguments.clone());
        let _ = writeln!(self.out, "\n[tool call] {} {args}", call.name);
    }

    fn on_tool_result(&mut self, call: &ToolCall, result: &ToolResult) {
        let time = result.metadata.execution_time.unwrap_or_default();
        let _ = if result.success {
            writeln!(self.out, "[tool ok] {} ({time} ms)", call.name)
        } else {
            writeln!(
                self.out,
                "[tool failed] {}: {}",
                call.name,
                result.error.as_deref().unwrap_or_default()
            )
        };
    }
}

/// Reads an image file as a `data:` URL.
pub fn image_data_url(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image '{}'", path.display()))?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}

/// HTML to refine or convert: the markup of a saved transcript, or the file
/// as-is when it contains no markdown answer.
pub fn load_html(path: &Path) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    Ok(parse_markdown(&raw).html.unwrap_or(raw))
}

/// Catalog definitions offered to the model under the current settings.
pub fn offered_tools(config: &OpenUiConfig) -> Vec<ToolDefinition> {
    let groups = openui_builtins::default_tool_schemas();
    openui_builtins::enabled_definitions(&groups, &config.tools.allowed)
        .into_iter()
        .cloned()
        .collect()
}

fn model_config(config: &OpenUiConfig) -> anyhow::Result<ModelConfig> {
    config.model(std::env::var(API_KEY_ENV).ok())
}

async fn stream(
    config: &OpenUiConfig,
    model: ModelConfig,
    request: &ChatRequest,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = ToolSession::new(backends::from_config(model));
    if request.has_tools() {
        let executor = ToolExecutor::new(Arc::new(config.tools.registry()));
        session = session.with_executor(executor);
    }

    let mut observer = TerminalObserver::new(std::io::stdout());
    let outcome = session.run(request, &mut observer).await?;
    println!();

    info!(
        chars = outcome.text.len(),
        tool_calls = outcome.tool_calls.len(),
        "Generation finished"
    );

    if let Some(path) = output {
        let parsed = observer.parser().parsed();
        let html = parsed.html.as_deref().context("No HTML in response")?;
        std::fs::write(path, fix_html(html))
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        let name = parsed.name().unwrap_or("Untitled");
        let emoji = parsed.emoji().unwrap_or_default();
        eprintln!("Saved {emoji} {name} to {}", path.display());
    }
    Ok(())
}

pub async fn generate(
    config: &OpenUiConfig,
    prompt: String,
    image: Option<&Path>,
    tools: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let model = model_config(config)?;
    let options = GenerateOptions {
        action: Action::Create,
        query: prompt,
        image: image.map(image_data_url).transpose()?,
        tools: if tools || config.tools.enabled {
            offered_tools(config)
        } else {
            Vec::new()
        },
        ..GenerateOptions::default()
    };
    let request = build_generate_request(&model, &options);
    stream(config, model, &request, output).await
}

pub async fn refine(
    config: &OpenUiConfig,
    file: &Path,
    prompt: String,
    tools: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let model = model_config(config)?;
    let options = GenerateOptions {
        action: Action::Refine,
        query: prompt,
        html: Some(load_html(file)?),
        tools: if tools || config.tools.enabled {
            offered_tools(config)
        } else {
            Vec::new()
        },
        ..GenerateOptions::default()
    };
    let request = build_generate_request(&model, &options);
    stream(config, model, &request, output).await
}

pub async fn convert(
    config: &OpenUiConfig,
    file: &Path,
    framework: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let model = model_config(config)?;
    let html = load_html(file)?;
    let request = build_convert_request(&model, framework, &html);

    let session = ToolSession::new(backends::from_config(model));
    let mut observer = TerminalObserver::new(std::io::stdout());
    let outcome = session.run(&request, &mut observer).await?;
    println!();

    if let Some(path) = output {
        std::fs::write(path, outcome.text)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Saved {framework} component to {}", path.display());
    }
    Ok(())
}

pub fn list_tools(config: &OpenUiConfig) {
    let registry = config.tools.registry();
    let offered: Vec<String> = offered_tools(config).into_iter().map(|d| d.name).collect();

    for group in openui_builtins::default_tool_schemas() {
        println!("{}:", group.name);
        for def in &group.schema {
            let marker = if offered.contains(&def.name) { "*" } else { " " };
            println!(" {marker} {} - {}", def.name, def.description);
            for (param, prop) in &def.parameters.properties {
                let required = if def.parameters.required.contains(param) {
                    ", required"
                } else {
                    ""
                };
                println!(
                    "       {param} ({}{required}): {}",
                    prop.kind, prop.description
                );
            }
        }
    }
    println!(
        "\nTotal: {} tool(s), {} offered (*)",
        registry.tool_count(),
        offered.len()
    );
}

pub async fn run_tool(config: &OpenUiConfig, name: &str, args: &str) -> anyhow::Result<bool> {
    let args: serde_json::Value =
        serde_json::from_str(args).context("Tool arguments must be a JSON object")?;
    anyhow::ensure!(args.is_object(), "Tool arguments must be a JSON object");

    let executor = ToolExecutor::new(Arc::new(config.tools.registry()));
    let mut call = ToolCall::from_value("cli", name, args);
    let result = executor.run(&mut call).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.success)
}
