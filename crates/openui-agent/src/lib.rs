//! Streaming UI generation for OpenUI.
//!
//! Turns prompts into chat-completion requests, streams the answer from an
//! OpenAI-compatible backend and folds it into text plus finalized tool
//! calls, which can then be executed through an
//! [`openui_tools::ToolExecutor`].
//!
//! # Main types
//!
//! - [`StreamAccumulator`]: per-request session state fed chunk by chunk.
//! - [`FragmentMerger`]: incremental JSON merging of argument fragments.
//! - [`ToolSession`]: opens a stream, consumes it and runs the tool calls.
//! - [`ChatBackend`] / [`OpenAiBackend`]: the transport seam.
//! - [`MarkdownParser`]: frontmatter and HTML extraction while streaming.

/// Chunk folding and stream observers.
pub mod accumulator;
/// Chat transports.
pub mod backends;
/// Model and provider settings.
pub mod config;
/// Frontmatter and HTML extraction.
pub mod markdown;
/// Argument fragment merging.
pub mod merge;
/// Prompt and request construction.
pub mod prompts;
/// Chat request types.
pub mod request;
/// End-to-end streaming sessions.
pub mod session;

pub use accumulator::{
    consume_stream, PartialToolCall, StreamAccumulator, StreamFailure, StreamObserver,
    StreamOutput,
};
pub use backends::{ChatBackend, ChunkStream, OpenAiBackend};
pub use config::{LlmProvider, ModelConfig};
pub use markdown::{fix_html, new_chapter, parse_markdown, MarkdownParser, ParsedMarkdown};
pub use merge::FragmentMerger;
pub use prompts::{build_convert_request, build_generate_request, Action, GenerateOptions};
pub use request::{ChatMessage, ChatRequest};
pub use session::{SessionError, SessionOutcome, ToolSession};
