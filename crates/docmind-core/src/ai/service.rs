//! AiService: prompt dispatch to whichever provider the settings select.
//!
//! Providers are built per call through the [`ProviderFactory`] port, so a
//! settings change never leaves a stale client behind.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tracing::{Instrument, debug, error, info_span};

use docmind_types::ai::{AiSettings, ErrorLocale};
use docmind_types::error::AiError;
use docmind_types::llm::{CompletionRequest, LlmError, Message, StreamEvent};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::factory::ProviderFactory;

/// System prompt for questions answered from workspace content.
pub const ASK_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer questions based on the provided context.";

/// Text chunks in arrival order. Ends after the first error.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, AiError>> + Send>>;

/// Vectors from one embedding call plus the model that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingBatch {
    pub model: String,
    pub vectors: Vec<Vec<f32>>,
}

/// Result of a connectivity probe against the configured provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
    pub reply: String,
}

pub struct AiService<F: ProviderFactory> {
    settings: Arc<AiSettings>,
    factory: F,
}

impl<F: ProviderFactory> AiService<F> {
    pub fn new(settings: Arc<AiSettings>, factory: F) -> Self {
        Self { settings, factory }
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    pub fn error_locale(&self) -> ErrorLocale {
        self.settings.error_locale
    }

    /// True when a driver is named in the settings.
    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    fn ensure_configured(&self) -> Result<(), AiError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(AiError::Disabled)
        }
    }

    fn language_model(&self) -> Result<BoxLlmProvider, AiError> {
        self.ensure_configured()?;
        let provider = self.factory.language_model(&self.settings).inspect_err(|e| {
            error!(error = %e, "Failed to select language model");
        })?;
        debug!(provider = provider.name(), model = provider.model(), "Language model selected");
        Ok(provider)
    }

    fn request(provider: &BoxLlmProvider, prompt: &str, system_prompt: Option<&str>) -> CompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(prompt));

        CompletionRequest {
            model: provider.model().to_string(),
            messages,
            ..Default::default()
        }
    }

    /// Generate the full completion text for `prompt`.
    pub async fn generate_content(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, AiError> {
        let provider = self.language_model()?;
        let request = Self::request(&provider, prompt, system_prompt);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.stream = false,
        );

        match provider.complete(&request).instrument(span).await {
            Ok(response) => Ok(response.content),
            Err(source) => {
                error!(provider = provider.name(), error = %source, "Failed to generate content");
                Err(AiError::Generation { source })
            }
        }
    }

    /// Stream completion text for `prompt`.
    ///
    /// Provider selection happens before this returns, so configuration
    /// errors are reported before any chunk is produced.
    pub fn generate_content_stream(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<TextStream, AiError> {
        let provider = self.language_model()?;
        let request = Self::request(&provider, prompt, system_prompt);
        let provider_name = provider.name().to_string();
        let mut events = provider.stream(request);

        let stream = async_stream::stream! {
            while let Some(event) = events.next().await {
                match event {
                    Ok(StreamEvent::TextDelta { text }) => {
                        if !text.is_empty() {
                            yield Ok::<String, AiError>(text);
                        }
                    }
                    Ok(StreamEvent::Done) => break,
                    Ok(_) => {}
                    Err(source) => {
                        error!(provider = %provider_name, error = %source, "Failed to stream content");
                        yield Err(AiError::Streaming { source });
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    /// Embed `texts` and report which model produced the vectors.
    pub async fn embedding_batch(&self, texts: &[String]) -> Result<EmbeddingBatch, AiError> {
        self.ensure_configured()?;
        let embedder = self.factory.embedding_model(&self.settings).inspect_err(|e| {
            error!(error = %e, "Failed to select embedding model");
        })?;
        let model = embedder.model_name().to_string();

        if texts.is_empty() {
            return Ok(EmbeddingBatch {
                model,
                vectors: Vec::new(),
            });
        }

        let span = info_span!(
            "gen_ai.embeddings",
            gen_ai.system = self.settings.driver.as_deref(),
            gen_ai.request.model = %model,
            inputs = texts.len(),
        );

        let vectors = embedder.embed(texts).instrument(span).await.map_err(|source| {
            error!(model = %model, error = %source, "Failed to generate embeddings");
            AiError::Embedding { source }
        })?;

        if vectors.len() != texts.len() {
            let source = LlmError::Deserialization(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            ));
            error!(model = %model, error = %source, "Failed to generate embeddings");
            return Err(AiError::Embedding { source });
        }

        Ok(EmbeddingBatch { model, vectors })
    }

    /// Embed `texts`, one vector per input in input order.
    pub async fn generate_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AiError> {
        Ok(self.embedding_batch(texts).await?.vectors)
    }

    /// Send a tiny completion to check credentials and reachability.
    pub async fn probe(&self) -> Result<ProbeReport, AiError> {
        let provider = self.language_model()?;
        let request = CompletionRequest {
            max_tokens: Some(10),
            ..Self::request(&provider, "Hello", None)
        };

        let span = info_span!(
            "gen_ai.probe",
            gen_ai.system = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
        );

        let started = Instant::now();
        let response = provider.complete(&request).instrument(span).await.map_err(|source| {
            error!(provider = provider.name(), error = %source, "Provider probe failed");
            AiError::Generation { source }
        })?;

        Ok(ProbeReport {
            provider: provider.name().to_string(),
            model: response.model,
            latency_ms: started.elapsed().as_millis() as u64,
            reply: response.content,
        })
    }
}
