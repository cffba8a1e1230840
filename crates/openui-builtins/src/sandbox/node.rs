use super::{Console, ScriptError, ScriptSandbox};
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Reads the script from stdin, runs it as `new Function('console', src)`
/// and prints one JSON outcome object on the last stdout line. The console
/// handed to the script inherits every method of the real one; `log` is
/// collected and `info`, `debug`, `warn` and `error` are reported back as
/// diagnostics.
const WRAPPER: &str = r#"
let src = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', (c) => { src += c; });
process.stdin.on('end', () => {
  const logs = [];
  const diagnostics = [];
  const fmt = (a) => {
    if (typeof a === 'object' && a !== null) {
      try { return JSON.stringify(a, null, 2); } catch (_) { return String(a); }
    }
    return String(a);
  };
  const line = (args) => args.map(fmt).join(' ');
  const report = (method) => (...args) => diagnostics.push({ method, line: line(args) });
  const captured = Object.assign(Object.create(console), {
    log: (...args) => logs.push(line(args)),
    info: report('info'),
    debug: report('debug'),
    warn: report('warn'),
    error: report('error'),
  });
  let out;
  try {
    const r = new Function('console', src)(captured);
    out = { ok: true, result: r === undefined ? null : r, logs, diagnostics };
  } catch (e) {
    const message = e && e.message !== undefined ? String(e.message) : String(e);
    out = { ok: false, message, logs, diagnostics };
  }
  let text;
  try { text = JSON.stringify(out); }
  catch (e) { text = JSON.stringify({ ok: true, result: String(out.result), logs, diagnostics }); }
  process.stdout.write('\n' + text + '\n');
});
"#;

/// Settings for [`NodeSandbox`].
#[derive(Debug, Clone)]
pub struct NodeSandboxConfig {
    /// Path or name of the `node` executable.
    pub binary: String,
    /// Wall-clock limit for one evaluation.
    pub timeout_secs: u64,
}

impl Default for NodeSandboxConfig {
    fn default() -> Self {
        Self {
            binary: "node".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Runs scripts in a short-lived `node` subprocess.
///
/// Full JavaScript semantics, at the cost of a process spawn per call. The
/// process is killed when the deadline passes.
pub struct NodeSandbox {
    config: NodeSandboxConfig,
}

#[derive(Deserialize)]
struct NodeOutcome {
    ok: bool,
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    message: String,
    #[serde(default)]
    logs: Vec<String>,
    #[serde(default)]
    diagnostics: Vec<NodeDiagnostic>,
}

#[derive(Deserialize)]
struct NodeDiagnostic {
    method: String,
    line: String,
}

impl NodeSandbox {
    /// Sandbox spawning `config.binary`.
    pub fn new(config: NodeSandboxConfig) -> Self {
        Self { config }
    }

    /// True when the configured binary can be started.
    pub async fn is_available(&self) -> bool {
        tokio::process::Command::new(&self.config.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Default for NodeSandbox {
    fn default() -> Self {
        Self::new(NodeSandboxConfig::default())
    }
}

#[async_trait]
impl ScriptSandbox for NodeSandbox {
    fn name(&self) -> &str {
        "node"
    }

    async fn evaluate(
        &self,
        code: &str,
        console: &Console,
    ) -> Result<serde_json::Value, ScriptError> {
        debug!(binary = %self.config.binary, bytes = code.len(), "Spawning node sandbox");

        let mut child = tokio::process::Command::new(&self.config.binary)
            .arg("-e")
            .arg(WRAPPER)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScriptError::Unavailable(format!("{}: {e}", self.config.binary)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(code.as_bytes())
                .await
                .map_err(|e| ScriptError::Unavailable(format!("writing script: {e}")))?;
        }

        let output = match tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait_with_output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ScriptError::Unavailable(e.to_string())),
            Err(_) => {
                warn!(timeout = self.config.timeout_secs, "Node sandbox timed out");
                return Err(ScriptError::Timeout(self.config.timeout_secs));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let last_line = stdout.trim().lines().last().unwrap_or_default();
        let outcome: NodeOutcome = match serde_json::from_str(last_line) {
            Ok(outcome) => outcome,
            Err(_) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = stderr
                    .lines()
                    .find(|l| l.contains("Error"))
                    .unwrap_or(stderr.trim())
                    .to_string();
                info!(status = ?output.status.code(), "Node sandbox produced no outcome");
                return Err(ScriptError::Runtime(if message.is_empty() {
                    format!("node exited with {}", output.status)
                } else {
                    message
                }));
            }
        };

        for line in outcome.logs {
            console.log_line(line);
        }
        for diagnostic in &outcome.diagnostics {
            console.diagnostic(&diagnostic.method, &diagnostic.line);
        }

        if outcome.ok {
            Ok(outcome.result)
        } else {
            Err(ScriptError::Runtime(outcome.message))
        }
    }
}
