//! Page indexing and semantic search over stored chunk embeddings.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use docmind_types::embedding::{
    EMBEDDING_DIMENSIONS, EmbeddingMatch, IndexReport, NewPageEmbedding, PageRef, TextChunk,
};
use docmind_types::error::AiError;

use crate::ai::service::AiService;
use crate::embedding::repository::{PageEmbeddingRepository, SimilarityQuery};
use crate::llm::factory::ProviderFactory;

pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Clamp a requested result count into `1..=MAX_SEARCH_LIMIT`.
pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT)
}

/// Reject any vector that does not fit the `vector(1536)` column.
fn check_dimensions(vectors: &[Vec<f32>]) -> Result<(), AiError> {
    match vectors.iter().find(|v| v.len() != EMBEDDING_DIMENSIONS) {
        Some(bad) => Err(AiError::DimensionMismatch {
            expected: EMBEDDING_DIMENSIONS,
            actual: bad.len(),
        }),
        None => Ok(()),
    }
}

pub struct EmbeddingService<R: PageEmbeddingRepository, F: ProviderFactory> {
    repo: R,
    ai: Arc<AiService<F>>,
}

impl<R: PageEmbeddingRepository, F: ProviderFactory> EmbeddingService<R, F> {
    pub fn new(repo: R, ai: Arc<AiService<F>>) -> Self {
        Self { repo, ai }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Embed `chunks` and make them the page's only stored embeddings.
    pub async fn index_page(
        &self,
        page: PageRef,
        chunks: Vec<TextChunk>,
    ) -> Result<IndexReport, AiError> {
        if chunks.is_empty() {
            let removed = self.repo.replace_page_embeddings(&page.page_id, &[]).await?;
            info!(page_id = %page.page_id, removed, "Page has no content, embeddings cleared");
            return Ok(IndexReport {
                page_id: page.page_id,
                chunks: 0,
                model: None,
                dimensions: 0,
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let batch = self.ai.embedding_batch(&texts).await?;
        check_dimensions(&batch.vectors).inspect_err(|e| {
            error!(page_id = %page.page_id, model = %batch.model, error = %e, "Rejected embeddings");
        })?;

        let now = Utc::now();
        let rows: Vec<NewPageEmbedding> = chunks
            .into_iter()
            .zip(batch.vectors)
            .map(|(chunk, embedding)| NewPageEmbedding {
                id: Uuid::now_v7(),
                page: page.clone(),
                model_name: batch.model.clone(),
                model_dimensions: embedding.len() as u32,
                embedding,
                chunk_index: chunk.index,
                chunk_start: chunk.start,
                chunk_length: chunk.length,
                metadata: serde_json::json!({}),
                created_at: now,
            })
            .collect();

        let written = self.repo.replace_page_embeddings(&page.page_id, &rows).await?;
        info!(page_id = %page.page_id, chunks = written, model = %batch.model, "Page indexed");

        Ok(IndexReport {
            page_id: page.page_id,
            chunks: rows.len(),
            model: Some(batch.model),
            dimensions: EMBEDDING_DIMENSIONS,
        })
    }

    /// Drop every stored chunk of a page.
    pub async fn remove_page(&self, page_id: &Uuid) -> Result<u64, AiError> {
        let removed = self.repo.delete_page_embeddings(page_id).await?;
        info!(page_id = %page_id, removed, "Page embeddings removed");
        Ok(removed)
    }

    /// Find the chunks closest to `query` within a workspace (and optionally a space).
    pub async fn search(
        &self,
        query: &str,
        workspace_id: Uuid,
        space_id: Option<Uuid>,
        limit: Option<u32>,
    ) -> Result<Vec<EmbeddingMatch>, AiError> {
        if query.trim().is_empty() {
            return Err(AiError::InvalidRequest("query must not be empty".to_string()));
        }

        let mut vectors = self.ai.generate_embeddings(&[query.to_string()]).await?;
        check_dimensions(&vectors)?;
        let embedding = vectors.pop().ok_or_else(|| {
            AiError::InvalidRequest("embedding provider returned no vector".to_string())
        })?;

        let query = SimilarityQuery {
            embedding,
            workspace_id,
            space_id,
            limit: clamp_limit(limit),
        };
        Ok(self.repo.search(&query).await?)
    }
}
