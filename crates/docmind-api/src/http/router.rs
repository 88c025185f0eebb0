//! Axum router configuration with middleware.
//!
//! AI routes live under `/api/ai/` and are all `POST`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ai_routes = Router::new()
        // Generation
        .route("/generate", post(handlers::ai::generate))
        .route("/generate/stream", post(handlers::ai::generate_stream))
        .route("/ask", post(handlers::ai::ask))
        .route("/config", post(handlers::ai::config))
        .route("/test", post(handlers::ai::test))
        // Page embeddings
        .route("/embeddings", post(handlers::embedding::index_page))
        .route("/embeddings/search", post(handlers::embedding::search))
        .route("/embeddings/delete", post(handlers::embedding::delete_page));

    Router::new()
        .nest("/api/ai", ai_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
