//! Page embedding records and chunk metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Width of the `page_embeddings.embedding` column (`vector(1536)`).
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// How page content should be split before embedding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Text,
    Markdown,
}

/// Identifies the page (and optionally the attachment) that owns a set of embeddings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    pub page_id: Uuid,
    pub space_id: Uuid,
    pub workspace_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<Uuid>,
}

/// A slice of page content prepared for embedding.
///
/// `start` and `length` are character offsets into the original content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub index: u32,
    pub start: u32,
    pub length: u32,
    pub text: String,
}

/// A row ready to be inserted into `page_embeddings`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPageEmbedding {
    pub id: Uuid,
    pub page: PageRef,
    pub model_name: String,
    pub model_dimensions: u32,
    pub embedding: Vec<f32>,
    pub chunk_index: u32,
    pub chunk_start: u32,
    pub chunk_length: u32,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A stored chunk returned by similarity search, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingMatch {
    pub id: Uuid,
    pub page_id: Uuid,
    pub space_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<Uuid>,
    pub chunk_index: u32,
    pub chunk_start: u32,
    pub chunk_length: u32,
    pub model_name: String,
    /// Cosine distance (`<=>`): 0 is identical, 2 is opposite.
    pub distance: f64,
}

/// Outcome of (re)indexing one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub page_id: Uuid,
    pub chunks: usize,
    pub model: Option<String>,
    pub dimensions: usize,
}
