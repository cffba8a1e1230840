/// OpenAI-compatible streaming backend.
pub mod openai;

use crate::config::ModelConfig;
use crate::request::ChatRequest;
use async_trait::async_trait;
use futures_util::Stream;
use openui_core::{ResponseChunk, UiGenResult};
use std::pin::Pin;
use std::sync::Arc;

pub use openai::OpenAiBackend;

/// Chunks of one streaming completion, in arrival order.
///
/// An `Err` item is a transport failure; nothing follows it.
pub type ChunkStream = Pin<Box<dyn Stream<Item = UiGenResult<ResponseChunk>> + Send>>;

/// Trait for chat-completion backends.
///
/// Every supported provider speaks the OpenAI chat-completions protocol, so
/// [`OpenAiBackend`] serves all of them. Tests and embedders can plug in
/// their own implementation through [`crate::ToolSession::new`].
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Opens a streaming completion.
    ///
    /// Errors returned here mean the request never started streaming.
    async fn stream_chat(&self, request: &ChatRequest) -> UiGenResult<ChunkStream>;
}

/// Builds the backend for a model configuration.
pub fn from_config(config: ModelConfig) -> Arc<dyn ChatBackend> {
    Arc::new(OpenAiBackend::new(config))
}
