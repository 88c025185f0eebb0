//! HTTP/REST API layer for Docmind.
//!
//! Axum-based REST API at `/api/ai/` with API key authentication,
//! envelope response format, SSE streaming and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
pub mod sse;
