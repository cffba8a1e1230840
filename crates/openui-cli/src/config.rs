//! `openui.toml` loading.

use anyhow::Context;
use openui_agent::ModelConfig;
use openui_builtins::{
    NodeSandbox, NodeSandboxConfig, QuickJsConfig, QuickJsSandbox, ScriptSandbox,
};
use openui_tools::ToolRegistry;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Environment variable consulted when `[model].api_key` is empty.
pub const API_KEY_ENV: &str = "OPENUI_API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct OpenUiConfig {
    #[serde(default)]
    pub model: Option<ModelConfig>,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which back-end runs `javascript` tool calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxKind {
    /// Embedded QuickJS engine.
    #[default]
    QuickJs,
    /// `node` subprocess.
    Node,
}

#[derive(Debug, Deserialize)]
pub struct ToolsConfig {
    /// Offer tools to the model on every generate/refine.
    #[serde(default)]
    pub enabled: bool,
    /// Tool names to offer. Empty means the whole catalog.
    #[serde(default)]
    pub allowed: Vec<String>,
    #[serde(default)]
    pub sandbox: SandboxKind,
    #[serde(default = "default_sandbox_timeout")]
    pub sandbox_timeout_secs: u64,
    /// Heap ceiling for the QuickJS sandbox, in MiB.
    #[serde(default = "default_sandbox_memory")]
    pub sandbox_memory_mb: usize,
    #[serde(default = "default_node_binary")]
    pub node_binary: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed: Vec::new(),
            sandbox: SandboxKind::default(),
            sandbox_timeout_secs: default_sandbox_timeout(),
            sandbox_memory_mb: default_sandbox_memory(),
            node_binary: default_node_binary(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human format.
    #[serde(default)]
    pub json: bool,
}

fn default_sandbox_timeout() -> u64 {
    10
}
fn default_sandbox_memory() -> usize {
    32
}
fn default_node_binary() -> String {
    "node".to_string()
}

impl OpenUiConfig {
    /// Reads `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;
        Ok(config)
    }

    /// The model section with the API key filled from `env_key` when the
    /// file leaves it empty.
    pub fn model(&self, env_key: Option<String>) -> anyhow::Result<ModelConfig> {
        let Some(mut model) = self.model.clone() else {
            anyhow::bail!("No [model] section configured");
        };
        if model.api_key.is_empty() {
            if let Some(key) = env_key.filter(|k| !k.is_empty()) {
                model.api_key = key;
            }
        }
        Ok(model)
    }
}

impl ToolsConfig {
    pub fn sandbox(&self) -> Arc<dyn ScriptSandbox> {
        match self.sandbox {
            SandboxKind::QuickJs => Arc::new(QuickJsSandbox::with_config(QuickJsConfig {
                memory_limit_bytes: self.sandbox_memory_mb * 1024 * 1024,
                timeout_secs: self.sandbox_timeout_secs,
                ..QuickJsConfig::default()
            })),
            SandboxKind::Node => Arc::new(NodeSandbox::new(NodeSandboxConfig {
                binary: self.node_binary.clone(),
                timeout_secs: self.sandbox_timeout_secs,
            })),
        }
    }

    /// Registry with every built-in tool, scripts running in the configured
    /// sandbox.
    pub fn registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        openui_builtins::register_builtins_with_sandbox(&mut registry, self.sandbox());
        info!(
            count = registry.tool_count(),
            sandbox = ?self.sandbox,
            "Built-in tools registered"
        );
        registry
    }
}
