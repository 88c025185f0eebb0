//! LlmProvider trait definition.
//!
//! This is the core abstraction that all chat-capable vendor clients implement.
//! Uses RPITIT for `complete`, and `Pin<Box<dyn Stream>>` for `stream`
//! (streams need to be object-safe for the BoxLlmProvider wrapper).

use std::pin::Pin;

use futures_util::Stream;

use docmind_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

/// Boxed stream of provider events, `'static` so it can outlive the provider.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for LLM provider backends (OpenAI-compatible, Ollama, ...).
///
/// Implementations live in docmind-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "gemini", "ollama").
    fn name(&self) -> &str;

    /// Model used when the request leaves `model` empty.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// The stream must not borrow from `self`: the provider is usually
    /// dropped before the caller finishes reading.
    fn stream(&self, request: CompletionRequest) -> EventStream;
}
