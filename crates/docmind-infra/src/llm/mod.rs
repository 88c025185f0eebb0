//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] and [`Embedder`]
//! traits defined in `docmind-core`, plus [`DriverProviderFactory`], which
//! picks one of them from the configured driver string.
//!
//! [`LlmProvider`]: docmind_core::llm::provider::LlmProvider
//! [`Embedder`]: docmind_core::llm::embedder::Embedder

pub mod ollama;
pub mod openai_compat;

use secrecy::SecretString;
use tracing::debug;

use docmind_core::llm::box_embedder::BoxEmbedder;
use docmind_core::llm::box_provider::BoxLlmProvider;
use docmind_core::llm::factory::ProviderFactory;
use docmind_types::ai::{AiDriver, AiSettings};
use docmind_types::error::AiError;

use self::ollama::{OLLAMA_DEFAULT_URL, OllamaEmbedder, OllamaProvider};
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{OPENAI_BASE_URL, OpenAiCompatConfig, gemini_config, openai_config};
use self::openai_compat::embeddings::OpenAiCompatibleEmbedder;

/// Normalize a configured OpenAI-compatible base URL.
///
/// DeepSeek URLs lose a trailing `/v1` (DeepSeek serves the chat and
/// embedding routes at its API root). Every URL loses a trailing slash.
pub fn normalize_openai_url(url: &str) -> String {
    let mut url = url.trim();
    if url.contains("deepseek.com") {
        url = url.strip_suffix('/').unwrap_or(url);
        url = url.strip_suffix("/v1").unwrap_or(url);
    }
    url.strip_suffix('/').unwrap_or(url).to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_key(key: Option<&SecretString>, name: &str) -> Result<SecretString, AiError> {
    key.cloned().ok_or_else(|| AiError::MissingApiKey(name.to_string()))
}

/// Which client to build, resolved from settings but not yet constructed.
enum Target {
    OpenAiCompat(OpenAiCompatConfig),
    Ollama { base_url: String, model: String },
}

/// Builds vendor clients from [`AiSettings`] on every call.
///
/// Stateless: settings are read fresh each time, so nothing is cached
/// between requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverProviderFactory;

impl DriverProviderFactory {
    fn resolve(
        settings: &AiSettings,
        model: Option<&str>,
        not_configured: &str,
    ) -> Result<Target, AiError> {
        let (Some(driver), Some(model)) = (non_blank(settings.driver.as_deref()), non_blank(model))
        else {
            return Err(AiError::NotConfigured(not_configured.to_string()));
        };

        let driver: AiDriver = driver.parse().map_err(AiError::UnsupportedDriver)?;
        debug!(%driver, model, "Resolving AI provider");

        match driver {
            AiDriver::OpenAi => {
                let key = required_key(settings.openai_api_key.as_ref(), "OPENAI_API_KEY")?;
                let base_url = non_blank(settings.openai_api_url.as_deref())
                    .map(normalize_openai_url)
                    .unwrap_or_else(|| OPENAI_BASE_URL.to_string());
                Ok(Target::OpenAiCompat(openai_config(key, model, &base_url)))
            }
            AiDriver::Gemini => {
                let key = required_key(settings.gemini_api_key.as_ref(), "GEMINI_API_KEY")?;
                Ok(Target::OpenAiCompat(gemini_config(key, model)))
            }
            AiDriver::Ollama => Ok(Target::Ollama {
                base_url: non_blank(settings.ollama_api_url.as_deref())
                    .unwrap_or(OLLAMA_DEFAULT_URL)
                    .to_string(),
                model: model.to_string(),
            }),
        }
    }
}

impl ProviderFactory for DriverProviderFactory {
    fn language_model(&self, settings: &AiSettings) -> Result<BoxLlmProvider, AiError> {
        let target = Self::resolve(
            settings,
            settings.completion_model.as_deref(),
            "AI driver or model not configured",
        )?;

        Ok(match target {
            Target::OpenAiCompat(config) => BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)),
            Target::Ollama { base_url, model } => {
                BoxLlmProvider::new(OllamaProvider::new(&base_url, &model))
            }
        })
    }

    fn embedding_model(&self, settings: &AiSettings) -> Result<BoxEmbedder, AiError> {
        let target = Self::resolve(
            settings,
            settings.embedding_model.as_deref(),
            "AI driver or embedding model not configured",
        )?;

        Ok(match target {
            Target::OpenAiCompat(config) => BoxEmbedder::new(OpenAiCompatibleEmbedder::new(config)),
            Target::Ollama { base_url, model } => {
                BoxEmbedder::new(OllamaEmbedder::new(&base_url, &model))
            }
        })
    }
}
