use async_trait::async_trait;
use openui_core::{Arguments, ToolError, ToolResult};
use std::future::Future;

/// Trait that every tool implementation provides, built-in or registered at runtime.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool against fully assembled arguments.
    async fn call(&self, args: Arguments) -> Result<ToolResult, ToolError>;
}

/// Adapter turning an async closure into a [`ToolHandler`].
pub struct FnHandler<F> {
    f: F,
}

/// Wraps an async closure as a [`ToolHandler`].
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolResult, ToolError>> + Send,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolResult, ToolError>> + Send,
{
    async fn call(&self, args: Arguments) -> Result<ToolResult, ToolError> {
        (self.f)(args).await
    }
}
