//! Driver lookup port.
//!
//! The infra crate implements this by matching the configured driver string
//! against the vendors it knows how to reach.

use docmind_types::ai::AiSettings;
use docmind_types::error::AiError;

use super::box_embedder::BoxEmbedder;
use super::box_provider::BoxLlmProvider;

/// Builds vendor clients from settings.
///
/// Called once per request; implementations should be cheap and must not
/// cache clients across settings changes.
pub trait ProviderFactory: Send + Sync {
    /// Chat model for the configured driver and `completion_model`.
    fn language_model(&self, settings: &AiSettings) -> Result<BoxLlmProvider, AiError>;

    /// Embedding model for the configured driver and `embedding_model`.
    fn embedding_model(&self, settings: &AiSettings) -> Result<BoxEmbedder, AiError>;
}
