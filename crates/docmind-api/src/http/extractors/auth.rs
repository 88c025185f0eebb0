//! API key authentication extractor.
//!
//! Extracts and verifies API keys from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and compared against the hashes loaded from the
//! `api_keys` table at startup.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use docmind_infra::postgres::api_key::hash_api_key;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated request marker. Extracting this validates the API key.
pub struct Authenticated;

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key(parts)?;

        if state.api_keys.contains(&hash_api_key(&api_key)) {
            Ok(Authenticated)
        } else {
            tracing::debug!(uri = %parts.uri, "Rejected request with unknown API key");
            Err(AppError::Unauthorized(
                "Invalid API key. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
            ))
        }
    }
}

/// Extract the API key from request headers.
fn extract_api_key(parts: &Parts) -> Result<String, AppError> {
    // Try Authorization: Bearer <key>
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    // Try X-API-Key header
    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing API key. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/ai/config");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_header() {
        let key = extract_api_key(&parts(&[("authorization", "Bearer dmk_abc ")])).unwrap();
        assert_eq!(key, "dmk_abc");
    }

    #[test]
    fn test_x_api_key_header() {
        let key = extract_api_key(&parts(&[("x-api-key", "dmk_xyz")])).unwrap();
        assert_eq!(key, "dmk_xyz");
    }

    #[test]
    fn test_non_bearer_authorization_falls_through() {
        let key = extract_api_key(&parts(&[
            ("authorization", "Basic dXNlcjpwYXNz"),
            ("x-api-key", "dmk_xyz"),
        ]))
        .unwrap();
        assert_eq!(key, "dmk_xyz");
    }

    #[test]
    fn test_missing_key() {
        let err = extract_api_key(&parts(&[])).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg.starts_with("Missing API key")));
    }
}
