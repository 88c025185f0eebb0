//! LLM provider abstractions for Docmind.
//!
//! - `LlmProvider` / `Embedder`: RPITIT traits for concrete vendor clients
//! - `BoxLlmProvider` / `BoxEmbedder`: object-safe wrappers for dynamic dispatch
//! - `ProviderFactory`: driver lookup that turns settings into boxed clients

pub mod box_embedder;
pub mod box_provider;
pub mod embedder;
pub mod factory;
pub mod provider;
