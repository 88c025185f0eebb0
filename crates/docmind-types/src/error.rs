use thiserror::Error;

use crate::llm::LlmError;

/// Errors from AI service operations.
///
/// The first group are configuration problems, detected before any provider
/// call is made. The wrapped variants carry the provider error and keep its
/// text in their display string.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI is not configured")]
    Disabled,

    #[error("{0}")]
    NotConfigured(String),

    #[error("{0} is required")]
    MissingApiKey(String),

    #[error("Unsupported AI driver: {0}")]
    UnsupportedDriver(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Failed to generate content: {source}")]
    Generation { source: LlmError },

    #[error("Failed to stream content: {source}")]
    Streaming { source: LlmError },

    #[error("Failed to generate embeddings: {source}")]
    Embedding { source: LlmError },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl AiError {
    /// True for errors caused by configuration or the caller's input
    /// rather than by the provider or storage.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AiError::Disabled
                | AiError::NotConfigured(_)
                | AiError::MissingApiKey(_)
                | AiError::UnsupportedDriver(_)
                | AiError::InvalidRequest(_)
        )
    }

    /// The provider error behind this failure, if any.
    pub fn provider_error(&self) -> Option<&LlmError> {
        match self {
            AiError::Generation { source }
            | AiError::Streaming { source }
            | AiError::Embedding { source } => Some(source),
            _ => None,
        }
    }
}

/// Errors from repository operations (used by trait definitions in docmind-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("{0} is not set")]
    Missing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_error_display() {
        assert_eq!(AiError::Disabled.to_string(), "AI is not configured");
        assert_eq!(
            AiError::MissingApiKey("OPENAI_API_KEY".to_string()).to_string(),
            "OPENAI_API_KEY is required"
        );
        assert_eq!(
            AiError::UnsupportedDriver("cohere".to_string()).to_string(),
            "Unsupported AI driver: cohere"
        );
    }

    #[test]
    fn test_wrapped_error_keeps_vendor_text() {
        let err = AiError::Streaming {
            source: LlmError::Provider {
                message: "Insufficient Balance".to_string(),
            },
        };
        let text = err.to_string();
        assert!(text.starts_with("Failed to stream content: "));
        assert!(text.contains("Insufficient Balance"));
        assert!(err.provider_error().is_some());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
