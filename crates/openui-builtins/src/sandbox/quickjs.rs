//! In-process sandbox on the QuickJS engine.
//!
//! Each evaluation gets a fresh runtime with a memory ceiling, a stack
//! ceiling and an interrupt deadline. Running out of any of them raises an
//! ordinary script error, so a hostile script cannot take the host down.

use super::{Console, ScriptError, ScriptSandbox};
use async_trait::async_trait;
use rquickjs::{CatchResultExt, CaughtError, Context, Ctx, Function, Runtime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Installs `globalThis.console`. `log` lines are collected, the other
/// methods go to the host log.
const CONSOLE_PRELUDE: &str = r#"
(function (emit) {
  const fmt = (a) => {
    if (typeof a === 'object' && a !== null) {
      try { return JSON.stringify(a, null, 2); } catch (_) { return String(a); }
    }
    return String(a);
  };
  const writer = (method) => (...args) => emit(method, args.map(fmt).join(' '));
  globalThis.console = {
    log: writer('log'),
    info: writer('info'),
    debug: writer('debug'),
    warn: writer('warn'),
    error: writer('error'),
  };
})
"#;

/// Runs the source as `new Function('console', src)` and returns the
/// result as JSON text.
const RUNNER: &str = r#"
(function (src) {
  let value;
  try {
    value = new Function('console', src)(globalThis.console);
  } catch (e) {
    if (e instanceof Error) throw e;
    throw new Error(String(e));
  }
  let json;
  try { json = JSON.stringify(value); } catch (_) { json = JSON.stringify(String(value)); }
  return json === undefined ? 'null' : json;
})
"#;

/// Limits for [`QuickJsSandbox`].
#[derive(Debug, Clone)]
pub struct QuickJsConfig {
    /// Heap ceiling for one evaluation.
    pub memory_limit_bytes: usize,
    /// Native stack the engine may use before raising a stack overflow.
    pub max_stack_bytes: usize,
    /// Wall-clock limit for one evaluation.
    pub timeout_secs: u64,
}

impl Default for QuickJsConfig {
    fn default() -> Self {
        Self {
            memory_limit_bytes: 32 * 1024 * 1024,
            max_stack_bytes: 512 * 1024,
            timeout_secs: 10,
        }
    }
}

/// Evaluates scripts in an embedded QuickJS runtime on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct QuickJsSandbox {
    config: QuickJsConfig,
}

impl QuickJsSandbox {
    /// Sandbox with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sandbox with custom limits.
    pub fn with_config(config: QuickJsConfig) -> Self {
        Self { config }
    }

    /// Runs `code` on the current thread.
    pub fn run(&self, code: &str, console: &Console) -> Result<serde_json::Value, ScriptError> {
        let runtime = Runtime::new().map_err(unavailable)?;
        runtime.set_memory_limit(self.config.memory_limit_bytes);
        runtime.set_max_stack_size(self.config.max_stack_bytes);

        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = interrupted.clone();
        let deadline = Instant::now() + Duration::from_secs(self.config.timeout_secs);
        runtime.set_interrupt_handler(Some(Box::new(move || {
            let expired = Instant::now() >= deadline;
            if expired {
                flag.store(true, Ordering::Release);
            }
            expired
        })));

        let context = Context::full(&runtime).map_err(unavailable)?;
        let outcome = context.with(|ctx| {
            install_console(&ctx, console.clone())
                .catch(&ctx)
                .map_err(script_error)?;
            let runner: Function = ctx.eval(RUNNER).catch(&ctx).map_err(script_error)?;
            runner
                .call::<_, String>((code,))
                .catch(&ctx)
                .map_err(script_error)
        });

        let json = match outcome {
            Ok(json) => json,
            Err(_) if interrupted.load(Ordering::Acquire) => {
                warn!(
                    timeout = self.config.timeout_secs,
                    "QuickJS sandbox timed out"
                );
                return Err(ScriptError::Timeout(self.config.timeout_secs));
            }
            Err(e) => return Err(e),
        };
        serde_json::from_str(&json)
            .map_err(|e| ScriptError::Runtime(format!("result is not JSON: {e}")))
    }
}

#[async_trait]
impl ScriptSandbox for QuickJsSandbox {
    fn name(&self) -> &str {
        "quickjs"
    }

    async fn evaluate(
        &self,
        code: &str,
        console: &Console,
    ) -> Result<serde_json::Value, ScriptError> {
        debug!(bytes = code.len(), "Evaluating in QuickJS");
        let sandbox = self.clone();
        let code = code.to_string();
        let console = console.clone();
        tokio::task::spawn_blocking(move || sandbox.run(&code, &console))
            .await
            .map_err(|e| ScriptError::Unavailable(e.to_string()))?
    }
}

fn install_console(ctx: &Ctx<'_>, console: Console) -> rquickjs::Result<()> {
    let emit = Function::new(ctx.clone(), move |method: String, line: String| {
        if method == "log" {
            console.log_line(line);
        } else {
            console.diagnostic(&method, &line);
        }
    })?;
    let install: Function = ctx.eval(CONSOLE_PRELUDE)?;
    install.call::<_, ()>((emit,))
}

fn unavailable(err: rquickjs::Error) -> ScriptError {
    ScriptError::Unavailable(err.to_string())
}

fn script_error(err: CaughtError<'_>) -> ScriptError {
    match err {
        CaughtError::Exception(exception) => {
            let message = exception.message().unwrap_or_default();
            let name: Option<String> = exception.get("name").ok().flatten();
            match name.as_deref() {
                Some("SyntaxError") => ScriptError::Syntax(message),
                _ if message.is_empty() => {
                    ScriptError::Runtime(name.unwrap_or_else(|| "Error".into()))
                }
                _ => ScriptError::Runtime(message),
            }
        }
        other => ScriptError::Runtime(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::sandbox::ConsoleCapture;
    use serde_json::json;

    fn eval(code: &str) -> (Result<serde_json::Value, ScriptError>, Vec<String>) {
        let capture = ConsoleCapture::acquire();
        let outcome = QuickJsSandbox::new().run(code, capture.console());
        (outcome, capture.finish())
    }

    #[test]
    fn test_returns_value_and_logs() {
        let (value, logs) = eval("console.log('hi', {a: 1}); return [1, 2].map(x => x * 2);");
        assert_eq!(value.unwrap(), json!([2, 4]));
        assert_eq!(logs, vec!["hi {\n  \"a\": 1\n}"]);
    }

    #[test]
    fn test_no_return_yields_null() {
        let (value, _) = eval("const x = 1;");
        assert_eq!(value.unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_loops_and_functions() {
        let (value, _) = eval(
            "function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); }\n\
             let total = 0;\n\
             for (let i = 0; i < 10; i++) { total += fib(i); }\n\
             return total;",
        );
        assert_eq!(value.unwrap(), json!(88));
    }

    #[test]
    fn test_other_console_methods_are_not_collected() {
        let (value, logs) = eval(
            "console.warn('w'); console.error('e'); console.info('i'); console.debug('d'); console.log('kept'); return 2;",
        );
        assert_eq!(value.unwrap(), json!(2));
        assert_eq!(logs, vec!["kept"]);
    }

    #[test]
    fn test_thrown_values_become_runtime_errors() {
        let (err, _) = eval("throw new Error('nope')");
        assert_eq!(err.unwrap_err(), ScriptError::Runtime("nope".into()));

        let (err, _) = eval("throw 'plain'");
        assert_eq!(err.unwrap_err(), ScriptError::Runtime("plain".into()));

        let (err, _) = eval("return missing + 1");
        assert!(matches!(err.unwrap_err(), ScriptError::Runtime(m) if m.contains("missing")));
    }

    #[test]
    fn test_syntax_error() {
        let (err, _) = eval("return (1 + ;");
        assert!(matches!(err.unwrap_err(), ScriptError::Syntax(_)));
    }

    #[test]
    fn test_logs_before_failure_are_kept() {
        let (err, logs) = eval("console.log('step 1'); throw new Error('later')");
        assert!(err.is_err());
        assert_eq!(logs, vec!["step 1"]);
    }

    #[test]
    fn test_evaluations_do_not_share_globals() {
        let sandbox = QuickJsSandbox::new();
        let capture = ConsoleCapture::acquire();
        sandbox
            .run("globalThis.leak = 1;", capture.console())
            .unwrap();
        let value = sandbox
            .run("return typeof leak;", capture.console())
            .unwrap();
        assert_eq!(value, json!("undefined"));
    }

    #[test]
    fn test_unserializable_result_falls_back_to_string() {
        let (value, _) = eval("const a = {}; a.self = a; return a;");
        assert_eq!(value.unwrap(), json!("[object Object]"));
    }

    #[test]
    fn test_deep_unary_nesting_is_an_error() {
        let code = format!("return {}1", "-".repeat(90_000));
        let (err, _) = eval(&code);
        assert!(err.is_err());
    }

    #[test]
    fn test_long_member_chain_does_not_crash() {
        let code = format!("let a = 1; return a{}", ".b".repeat(45_000));
        let (err, _) = eval(&code);
        assert!(err.is_err());
    }

    #[test]
    fn test_unbounded_recursion_is_an_error() {
        let (err, _) = eval("function f(n) { return f(n + 1) + 1; } return f(0);");
        assert!(matches!(err.unwrap_err(), ScriptError::Runtime(_)));
    }

    #[test]
    fn test_memory_limit() {
        let (err, _) = eval("return 'x'.repeat(10000).repeat(10000).repeat(10000).length");
        assert!(err.is_err());

        let (err, _) = eval("const xs = []; while (true) { xs.push(new Array(1000).fill(1)); }");
        assert!(err.is_err());
    }

    #[test]
    fn test_timeout() {
        let sandbox = QuickJsSandbox::with_config(QuickJsConfig {
            timeout_secs: 1,
            ..QuickJsConfig::default()
        });
        let capture = ConsoleCapture::acquire();
        let err = sandbox
            .run("while (true) {}", capture.console())
            .unwrap_err();
        assert_eq!(err, ScriptError::Timeout(1));
    }

    #[tokio::test]
    async fn test_evaluate_runs_on_blocking_pool() {
        let capture = ConsoleCapture::acquire();
        let value = QuickJsSandbox::new()
            .evaluate("console.log('async'); return 'ok';", capture.console())
            .await
            .unwrap();
        assert_eq!(value, json!("ok"));
        assert_eq!(capture.finish(), vec!["async"]);
    }
}
