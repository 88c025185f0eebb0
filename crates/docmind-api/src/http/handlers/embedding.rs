//! Page embedding handlers.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use docmind_infra::chunking::chunk_content;
use docmind_types::embedding::{ContentFormat, EmbeddingMatch, IndexReport, PageRef};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::handlers::ai::require_ai;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IndexPageRequest {
    #[serde(flatten)]
    pub page: PageRef,
    pub content: String,
    #[serde(default)]
    pub format: ContentFormat,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub workspace_id: Uuid,
    pub space_id: Option<Uuid>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePageRequest {
    pub page_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

/// POST /api/ai/embeddings - chunk, embed and store a page's content.
pub async fn index_page(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<IndexPageRequest>,
) -> Result<Json<ApiResponse<IndexReport>>, AppError> {
    info!(page_id = %body.page.page_id, format = ?body.format, "Index page endpoint called");
    require_ai(&state)?;
    let timer = RequestTimer::start();

    let chunks = chunk_content(&body.content, body.format);
    let report = state
        .embeddings
        .index_page(body.page, chunks)
        .await
        .map_err(|e| AppError::ai(e, state.ai.error_locale()))?;

    Ok(Json(timer.finish(report).with_link("search", "/api/ai/embeddings/search")))
}

/// POST /api/ai/embeddings/search - nearest stored chunks for a query.
pub async fn search(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ApiResponse<Vec<EmbeddingMatch>>>, AppError> {
    info!(workspace_id = %body.workspace_id, space_id = ?body.space_id, limit = ?body.limit, "Search endpoint called");
    require_ai(&state)?;
    let timer = RequestTimer::start();

    let matches = state
        .embeddings
        .search(&body.query, body.workspace_id, body.space_id, body.limit)
        .await
        .map_err(|e| AppError::ai(e, state.ai.error_locale()))?;

    Ok(Json(timer.finish(matches)))
}

/// POST /api/ai/embeddings/delete - drop every stored chunk of a page.
///
/// Works without a configured AI driver since no provider is called.
pub async fn delete_page(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<DeletePageRequest>,
) -> Result<Json<ApiResponse<DeleteResponse>>, AppError> {
    info!(page_id = %body.page_id, "Delete page embeddings endpoint called");
    let timer = RequestTimer::start();

    let deleted = state
        .embeddings
        .remove_page(&body.page_id)
        .await
        .map_err(|e| AppError::ai(e, state.ai.error_locale()))?;

    Ok(Json(timer.finish(DeleteResponse { deleted })))
}
