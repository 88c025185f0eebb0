//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (OpenAI-compatible `/embeddings`, Ollama `/api/embed`)
//! live in docmind-infra.

use docmind_types::llm::LlmError;

/// Trait for converting text into embedding vectors.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts. Returns one vector per input, in input order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, LlmError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-3-small").
    fn model_name(&self) -> &str;
}
