//! PageEmbeddingRepository trait definition.
//!
//! Storage port for chunk vectors. Follows the same RPITIT pattern as the
//! provider traits; the PostgreSQL/pgvector implementation lives in
//! docmind-infra.

use docmind_types::embedding::{EmbeddingMatch, NewPageEmbedding};
use docmind_types::error::RepositoryError;
use uuid::Uuid;

/// Parameters of a nearest-neighbour lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityQuery {
    pub embedding: Vec<f32>,
    pub workspace_id: Uuid,
    pub space_id: Option<Uuid>,
    pub limit: u32,
}

pub trait PageEmbeddingRepository: Send + Sync {
    /// Replace every stored chunk of `page_id` with `rows`, atomically.
    ///
    /// An empty `rows` clears the page. Returns the number of rows written.
    fn replace_page_embeddings(
        &self,
        page_id: &Uuid,
        rows: &[NewPageEmbedding],
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Delete all chunks of a page. Returns the number of rows removed.
    fn delete_page_embeddings(
        &self,
        page_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Closest live chunks by cosine distance, nearest first.
    fn search(
        &self,
        query: &SimilarityQuery,
    ) -> impl std::future::Future<Output = Result<Vec<EmbeddingMatch>, RepositoryError>> + Send;
}
