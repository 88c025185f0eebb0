//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use docmind_core::ai::failure::{FailureKind, StreamFailure};
use docmind_types::ai::ErrorLocale;
use docmind_types::error::AiError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// AI service failure, reported in the configured locale.
    Ai { source: AiError, locale: ErrorLocale },
    /// Authentication failure.
    Unauthorized(String),
}

impl AppError {
    pub fn ai(source: AiError, locale: ErrorLocale) -> Self {
        AppError::Ai { source, locale }
    }
}

fn failure_code(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Configuration => "AI_BAD_REQUEST",
        FailureKind::InsufficientBalance => "INSUFFICIENT_BALANCE",
        FailureKind::InvalidApiKey => "PROVIDER_UNAUTHORIZED",
        FailureKind::EndpointNotFound => "PROVIDER_NOT_FOUND",
        FailureKind::RateLimited => "RATE_LIMITED",
        FailureKind::Internal => "AI_ERROR",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Ai { source, locale } => {
                let kind = FailureKind::of(source);
                let failure = StreamFailure::classify(source, *locale);
                let status = StatusCode::from_u16(failure.status_code)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, failure_code(kind), failure.error)
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        };

        (status, Json(ApiResponse::error(code, &message))).into_response()
    }
}
