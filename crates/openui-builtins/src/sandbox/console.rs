//! Scoped console capture for script evaluation.
//!
//! Every evaluation gets its own [`Console`]. Lines logged through it are
//! always forwarded to `tracing` (target `openui::console`) and, while a
//! [`ConsoleCapture`] is held, also collected. Dropping the capture (on
//! success, error, or unwinding) stops collection, so a console handle that
//! outlives its evaluation only logs.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct ConsoleInner {
    lines: Mutex<Vec<String>>,
    capturing: AtomicBool,
}

/// Console handle passed to a sandbox.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

impl Console {
    fn new() -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                lines: Mutex::new(Vec::new()),
                capturing: AtomicBool::new(true),
            }),
        }
    }

    /// Logs an already formatted line.
    pub fn log_line(&self, line: impl Into<String>) {
        let line = line.into();
        info!(target: "openui::console", "{line}");
        if self.inner.capturing.load(Ordering::Acquire) {
            self.inner.lines.lock().push(line);
        }
    }

    /// Records a line written through `console.info`, `console.debug`,
    /// `console.warn` or `console.error`. These reach the host log only and
    /// are never collected.
    pub fn diagnostic(&self, method: &str, line: &str) {
        match method {
            "warn" | "error" => warn!(target: "openui::console", method, "{line}"),
            "info" => info!(target: "openui::console", method, "{line}"),
            _ => debug!(target: "openui::console", method, "{line}"),
        }
    }

    /// Whether lines are still being collected.
    pub fn is_capturing(&self) -> bool {
        self.inner.capturing.load(Ordering::Acquire)
    }

    fn release(&self) {
        self.inner.capturing.store(false, Ordering::Release);
    }
}

/// Guard that owns the collection window of a [`Console`].
pub struct ConsoleCapture {
    console: Console,
}

impl ConsoleCapture {
    /// Opens a fresh capture.
    pub fn acquire() -> Self {
        Self {
            console: Console::new(),
        }
    }

    /// The console to hand to the sandbox.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Closes the capture and returns the collected lines.
    pub fn finish(self) -> Vec<String> {
        self.console.release();
        std::mem::take(&mut *self.console.inner.lines.lock())
    }
}

impl Drop for ConsoleCapture {
    fn drop(&mut self) {
        self.console.release();
    }
}
