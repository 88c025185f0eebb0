//! pgvector-backed implementation of [`PageEmbeddingRepository`].
//!
//! Vectors travel as pgvector's text form (`[0.1,0.2,...]`) cast with
//! `::vector`, so no pgvector client crate is needed.

use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use docmind_core::embedding::repository::{PageEmbeddingRepository, SimilarityQuery};
use docmind_types::embedding::{EmbeddingMatch, NewPageEmbedding};
use docmind_types::error::RepositoryError;

use super::pool::DatabasePool;

/// Format a vector as a pgvector literal.
pub fn vector_literal(values: &[f32]) -> String {
    let mut out = String::with_capacity(values.len() * 10 + 2);
    out.push('[');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out.push(']');
    out
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

const INSERT_SQL: &str = "INSERT INTO page_embeddings \
    (id, page_id, space_id, workspace_id, attachment_id, model_name, model_dimensions, \
     embedding, chunk_index, chunk_start, chunk_length, metadata, created_at, updated_at) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8::vector, $9, $10, $11, $12, $13, $13)";

const SEARCH_SQL: &str = "SELECT id, page_id, space_id, attachment_id, chunk_index, chunk_start, \
    chunk_length, model_name, (embedding <=> $1::vector)::float8 AS distance \
    FROM page_embeddings \
    WHERE workspace_id = $2 AND deleted_at IS NULL AND ($3::uuid IS NULL OR space_id = $3) \
    ORDER BY embedding <=> $1::vector \
    LIMIT $4";

pub struct PgPageEmbeddingRepository {
    pool: DatabasePool,
}

impl PgPageEmbeddingRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn match_from_row(row: &PgRow) -> Result<EmbeddingMatch, sqlx::Error> {
        Ok(EmbeddingMatch {
            id: row.try_get("id")?,
            page_id: row.try_get("page_id")?,
            space_id: row.try_get("space_id")?,
            attachment_id: row.try_get("attachment_id")?,
            chunk_index: row.try_get::<i32, _>("chunk_index")? as u32,
            chunk_start: row.try_get::<i32, _>("chunk_start")? as u32,
            chunk_length: row.try_get::<i32, _>("chunk_length")? as u32,
            model_name: row.try_get("model_name")?,
            distance: row.try_get("distance")?,
        })
    }
}

impl PageEmbeddingRepository for PgPageEmbeddingRepository {
    async fn replace_page_embeddings(
        &self,
        page_id: &Uuid,
        rows: &[NewPageEmbedding],
    ) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.pool.begin().await.map_err(query_error)?;

        let deleted = sqlx::query("DELETE FROM page_embeddings WHERE page_id = $1")
            .bind(page_id)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?
            .rows_affected();

        for row in rows {
            sqlx::query(INSERT_SQL)
                .bind(row.id)
                .bind(row.page.page_id)
                .bind(row.page.space_id)
                .bind(row.page.workspace_id)
                .bind(row.page.attachment_id)
                .bind(&row.model_name)
                .bind(row.model_dimensions as i32)
                .bind(vector_literal(&row.embedding))
                .bind(row.chunk_index as i32)
                .bind(row.chunk_start as i32)
                .bind(row.chunk_length as i32)
                .bind(&row.metadata)
                .bind(row.created_at)
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)?;

        Ok(if rows.is_empty() {
            deleted
        } else {
            rows.len() as u64
        })
    }

    async fn delete_page_embeddings(&self, page_id: &Uuid) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM page_embeddings WHERE page_id = $1")
            .bind(page_id)
            .execute(&self.pool.pool)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }

    async fn search(&self, query: &SimilarityQuery) -> Result<Vec<EmbeddingMatch>, RepositoryError> {
        let rows = sqlx::query(SEARCH_SQL)
            .bind(vector_literal(&query.embedding))
            .bind(query.workspace_id)
            .bind(query.space_id)
            .bind(i64::from(query.limit))
            .fetch_all(&self.pool.pool)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| Self::match_from_row(row).map_err(query_error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docmind_types::embedding::{EMBEDDING_DIMENSIONS, PageRef};

    #[test]
    fn test_vector_literal() {
        assert_eq!(vector_literal(&[]), "[]");
        assert_eq!(vector_literal(&[0.5, -1.0, 2.25]), "[0.5,-1,2.25]");
    }

    #[test]
    fn test_pool_errors_map_to_connection() {
        assert!(matches!(
            query_error(sqlx::Error::PoolTimedOut),
            RepositoryError::Connection
        ));
        assert!(matches!(
            query_error(sqlx::Error::RowNotFound),
            RepositoryError::Query(_)
        ));
    }

    fn row(page: &PageRef, chunk_index: u32, axis: usize) -> NewPageEmbedding {
        let mut embedding = vec![0.0; EMBEDDING_DIMENSIONS];
        embedding[axis] = 1.0;
        NewPageEmbedding {
            id: Uuid::now_v7(),
            page: page.clone(),
            model_name: "text-embedding-3-small".to_string(),
            model_dimensions: EMBEDDING_DIMENSIONS as u32,
            embedding,
            chunk_index,
            chunk_start: chunk_index * 100,
            chunk_length: 100,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server with pgvector; set DATABASE_URL"]
    async fn test_replace_and_search_roundtrip() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let repo = PgPageEmbeddingRepository::new(DatabasePool::new(&url).await.unwrap());
        let page = PageRef {
            page_id: Uuid::now_v7(),
            space_id: Uuid::now_v7(),
            workspace_id: Uuid::now_v7(),
            attachment_id: None,
        };

        let written = repo
            .replace_page_embeddings(&page.page_id, &[row(&page, 0, 0), row(&page, 1, 1)])
            .await
            .unwrap();
        assert_eq!(written, 2);

        let mut probe = vec![0.0; EMBEDDING_DIMENSIONS];
        probe[1] = 1.0;
        let matches = repo
            .search(&SimilarityQuery {
                embedding: probe,
                workspace_id: page.workspace_id,
                space_id: Some(page.space_id),
                limit: 5,
            })
            .await
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].chunk_index, 1);
        assert!(matches[0].distance < 1e-6);

        let written = repo
            .replace_page_embeddings(&page.page_id, &[row(&page, 0, 2)])
            .await
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(repo.delete_page_embeddings(&page.page_id).await.unwrap(), 1);
    }
}
