//! Maps AI errors to the status code and message shown to the end user.
//!
//! Used for SSE error frames and for the JSON error envelope, so both
//! transports report the same thing for the same failure.

use serde::{Deserialize, Serialize};

use docmind_types::ai::ErrorLocale;
use docmind_types::error::AiError;
use docmind_types::llm::LlmError;

/// Broad category of a failure, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    InsufficientBalance,
    InvalidApiKey,
    EndpointNotFound,
    RateLimited,
    Internal,
}

impl FailureKind {
    pub fn status_code(&self) -> u16 {
        match self {
            FailureKind::Configuration => 400,
            FailureKind::InsufficientBalance => 402,
            FailureKind::InvalidApiKey => 401,
            FailureKind::EndpointNotFound => 404,
            FailureKind::RateLimited => 429,
            FailureKind::Internal => 500,
        }
    }

    /// Localized user-facing text. `None` means the raw error text is shown.
    pub fn message(&self, locale: ErrorLocale) -> Option<&'static str> {
        let text = match (self, locale) {
            (FailureKind::InsufficientBalance, ErrorLocale::Zh) => "账户余额不足，请充值后重试",
            (FailureKind::InsufficientBalance, ErrorLocale::En) => {
                "Insufficient account balance, please top up and retry"
            }
            (FailureKind::InvalidApiKey, ErrorLocale::Zh) => "API 密钥无效，请检查配置",
            (FailureKind::InvalidApiKey, ErrorLocale::En) => {
                "Invalid API key, please check the configuration"
            }
            (FailureKind::EndpointNotFound, ErrorLocale::Zh) => "API 端点不存在，请检查配置",
            (FailureKind::EndpointNotFound, ErrorLocale::En) => {
                "API endpoint not found, please check the configuration"
            }
            (FailureKind::RateLimited, ErrorLocale::Zh) => "请求过于频繁，请稍后重试",
            (FailureKind::RateLimited, ErrorLocale::En) => "Too many requests, please retry later",
            (FailureKind::Configuration | FailureKind::Internal, _) => return None,
        };
        Some(text)
    }

    /// Classify an error.
    ///
    /// Configuration errors come first, then typed provider errors, then a
    /// substring scan of the display text for vendors that only report the
    /// status inside their message.
    pub fn of(err: &AiError) -> Self {
        if err.is_configuration() {
            return FailureKind::Configuration;
        }

        if let Some(kind) = err.provider_error().and_then(Self::of_provider) {
            return kind;
        }

        Self::of_text(&err.to_string())
    }

    fn of_provider(err: &LlmError) -> Option<Self> {
        match err {
            LlmError::InsufficientBalance(_) => Some(FailureKind::InsufficientBalance),
            LlmError::AuthenticationFailed(_) => Some(FailureKind::InvalidApiKey),
            LlmError::NotFound(_) => Some(FailureKind::EndpointNotFound),
            LlmError::RateLimited(_) => Some(FailureKind::RateLimited),
            _ => None,
        }
    }

    fn of_text(text: &str) -> Self {
        if text.contains("Insufficient Balance") || text.contains("402") {
            FailureKind::InsufficientBalance
        } else if text.contains("401") || text.contains("Unauthorized") {
            FailureKind::InvalidApiKey
        } else if text.contains("404") || text.contains("Not Found") {
            FailureKind::EndpointNotFound
        } else if text.contains("429") || text.contains("Rate limit") {
            FailureKind::RateLimited
        } else {
            FailureKind::Internal
        }
    }
}

/// Payload of an SSE error frame: `{"error": .., "statusCode": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFailure {
    pub error: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl StreamFailure {
    pub fn classify(err: &AiError, locale: ErrorLocale) -> Self {
        let kind = FailureKind::of(err);
        let error = kind
            .message(locale)
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        Self {
            error,
            status_code: kind.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(message: &str) -> AiError {
        AiError::Streaming {
            source: LlmError::Provider {
                message: message.to_string(),
            },
        }
    }

    #[test]
    fn test_insufficient_balance_text() {
        let failure = StreamFailure::classify(&provider("Insufficient Balance"), ErrorLocale::Zh);
        assert_eq!(failure.status_code, 402);
        assert_eq!(failure.error, "账户余额不足，请充值后重试");
    }

    #[test]
    fn test_status_substrings() {
        let cases = [
            ("HTTP 401: bad key", 401),
            ("Unauthorized", 401),
            ("HTTP 404: model missing", 404),
            ("Not Found", 404),
            ("HTTP 429: slow down", 429),
            ("Rate limit reached for requests", 429),
        ];
        for (text, status) in cases {
            let failure = StreamFailure::classify(&provider(text), ErrorLocale::En);
            assert_eq!(failure.status_code, status, "text {text}");
        }
    }

    #[test]
    fn test_balance_checked_before_auth() {
        let failure = StreamFailure::classify(&provider("402 then 401"), ErrorLocale::En);
        assert_eq!(failure.status_code, 402);
    }

    #[test]
    fn test_typed_errors_take_precedence() {
        let err = AiError::Generation {
            source: LlmError::RateLimited("try later".to_string()),
        };
        let failure = StreamFailure::classify(&err, ErrorLocale::En);
        assert_eq!(failure.status_code, 429);
        assert_eq!(failure.error, "Too many requests, please retry later");

        let err = AiError::Generation {
            source: LlmError::AuthenticationFailed("nope".to_string()),
        };
        assert_eq!(StreamFailure::classify(&err, ErrorLocale::Zh).error, "API 密钥无效，请检查配置");
    }

    #[test]
    fn test_unknown_failure_keeps_raw_text() {
        let err = provider("connection reset by peer");
        let failure = StreamFailure::classify(&err, ErrorLocale::Zh);
        assert_eq!(failure.status_code, 500);
        assert_eq!(failure.error, err.to_string());
    }

    #[test]
    fn test_configuration_errors_are_400() {
        let err = AiError::MissingApiKey("OPENAI_API_KEY".to_string());
        let failure = StreamFailure::classify(&err, ErrorLocale::Zh);
        assert_eq!(failure.status_code, 400);
        assert_eq!(failure.error, "OPENAI_API_KEY is required");
    }

    #[test]
    fn test_serializes_status_code_camel_case() {
        let failure = StreamFailure {
            error: "boom".to_string(),
            status_code: 500,
        };
        let json = serde_json::to_string(&failure).unwrap();
        assert_eq!(json, r#"{"error":"boom","statusCode":500}"#);
    }
}
