//! AI generation handlers.
//!
//! POST /api/ai/generate          - one-shot generation
//! POST /api/ai/generate/stream   - SSE streamed generation
//! POST /api/ai/ask               - SSE streamed question answering
//! POST /api/ai/config            - configured flag and available actions
//! POST /api/ai/test              - liveness check for the AI routes

use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use docmind_core::ai::action::{AiAction, resolve_prompt};
use docmind_core::ai::service::ASK_SYSTEM_PROMPT;
use docmind_types::error::AiError;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::http::sse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub action: Option<String>,
    #[serde(default)]
    pub content: String,
    pub prompt: Option<String>,
}

impl GenerateRequest {
    fn prompt(&self) -> String {
        resolve_prompt(self.action.as_deref(), &self.content, self.prompt.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub query: String,
    pub space_id: Option<Uuid>,
    pub page_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub configured: bool,
    pub available_actions: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub message: &'static str,
    pub timestamp: String,
}

/// Reject the request with 400 when no AI driver is configured.
pub(crate) fn require_ai(state: &AppState) -> Result<(), AppError> {
    if state.ai.is_configured() {
        Ok(())
    } else {
        Err(AppError::ai(AiError::Disabled, state.ai.error_locale()))
    }
}

/// POST /api/ai/generate
pub async fn generate(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GenerateResponse>>, AppError> {
    info!(action = body.action.as_deref(), "Generate endpoint called");
    require_ai(&state)?;
    let timer = RequestTimer::start();

    let content = state
        .ai
        .generate_content(&body.prompt(), None)
        .await
        .map_err(|e| AppError::ai(e, state.ai.error_locale()))?;

    Ok(Json(timer.finish(GenerateResponse { content })))
}

/// POST /api/ai/generate/stream
pub async fn generate_stream(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<GenerateRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    info!(action = body.action.as_deref(), "Generate stream endpoint called");
    require_ai(&state)?;
    let locale = state.ai.error_locale();

    let chunks = state
        .ai
        .generate_content_stream(&body.prompt(), None)
        .map_err(|e| AppError::ai(e, locale))?;

    Ok(sse::into_sse(sse::frames(chunks, locale)))
}

/// POST /api/ai/ask
///
/// `spaceId` and `pageId` are accepted but do not narrow the answer yet.
pub async fn ask(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<AskRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    info!(
        query = %body.query,
        space_id = ?body.space_id,
        page_id = ?body.page_id,
        "Ask endpoint called"
    );
    require_ai(&state)?;
    let locale = state.ai.error_locale();

    let chunks = state
        .ai
        .generate_content_stream(&body.query, Some(ASK_SYSTEM_PROMPT))
        .map_err(|e| AppError::ai(e, locale))?;

    Ok(sse::into_sse(sse::frames(chunks, locale)))
}

/// POST /api/ai/config
pub async fn config(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Json<ApiResponse<ConfigResponse>> {
    info!("Config endpoint called");
    let timer = RequestTimer::start();

    Json(timer.finish(ConfigResponse {
        configured: state.ai.is_configured(),
        available_actions: AiAction::keywords(),
    }))
}

/// POST /api/ai/test
pub async fn test(_auth: Authenticated) -> Json<ApiResponse<TestResponse>> {
    info!("Test endpoint called");
    let timer = RequestTimer::start();

    Json(timer.finish(TestResponse {
        message: "AI controller is working",
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
