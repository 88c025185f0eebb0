//! Connection settings for OpenAI-compatible vendors.

use secrecy::SecretString;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for an OpenAI-compatible endpoint.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`] or an
/// [`super::embeddings::OpenAiCompatibleEmbedder`].
pub struct OpenAiCompatConfig {
    /// Driver name reported in logs and probe output ("openai", "gemini").
    pub provider_name: String,
    /// Base URL without a trailing slash (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model identifier (e.g., "gpt-4o-mini", "text-embedding-3-small").
    pub model: String,
}

/// OpenAI or any server speaking its protocol at `base_url`.
pub fn openai_config(api_key: SecretString, model: &str, base_url: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: base_url.into(),
        api_key,
        model: model.into(),
    }
}

/// Google Gemini through its OpenAI-compatible endpoint.
pub fn gemini_config(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: GEMINI_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}
