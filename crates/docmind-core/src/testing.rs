//! In-process fakes for the provider and repository ports.

use std::sync::{Arc, Mutex};

use futures_util::stream;
use uuid::Uuid;

use docmind_types::ai::AiSettings;
use docmind_types::embedding::{EMBEDDING_DIMENSIONS, EmbeddingMatch, NewPageEmbedding};
use docmind_types::error::{AiError, RepositoryError};
use docmind_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, StreamEvent, Usage,
};

use crate::embedding::repository::{PageEmbeddingRepository, SimilarityQuery};
use crate::llm::box_embedder::BoxEmbedder;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::embedder::Embedder;
use crate::llm::factory::ProviderFactory;
use crate::llm::provider::{EventStream, LlmProvider};

pub fn configured_settings() -> AiSettings {
    AiSettings {
        driver: Some("fake".to_string()),
        completion_model: Some("fake-chat".to_string()),
        embedding_model: Some("fake-embed".to_string()),
        ..Default::default()
    }
}

#[derive(Default)]
struct FakeState {
    chunks: Vec<String>,
    failure: Mutex<Option<LlmError>>,
    rejection: Mutex<Option<AiError>>,
    embedding_dimensions: Option<usize>,
    last_request: Mutex<Option<CompletionRequest>>,
    embed_calls: Mutex<usize>,
}

/// Factory handing out scripted providers. Clones share recorded state.
#[derive(Clone)]
pub struct FakeFactory {
    state: Arc<FakeState>,
}

impl FakeFactory {
    /// Providers reply with `chunks`, streamed one delta per chunk.
    pub fn replying(chunks: &[&str]) -> Self {
        Self::build(chunks, None, None)
    }

    /// Providers emit `chunks`, then fail with `error` (once).
    pub fn failing_after(chunks: &[&str], error: LlmError) -> Self {
        Self::build(chunks, Some(error), None)
    }

    /// The next provider lookup fails with `error`.
    pub fn rejecting(error: AiError) -> Self {
        Self::build(&[], None, Some(error))
    }

    fn build(chunks: &[&str], failure: Option<LlmError>, rejection: Option<AiError>) -> Self {
        Self {
            state: Arc::new(FakeState {
                chunks: chunks.iter().map(|c| c.to_string()).collect(),
                failure: Mutex::new(failure),
                rejection: Mutex::new(rejection),
                ..Default::default()
            }),
        }
    }

    pub fn with_embedding_dimensions(self, dimensions: usize) -> Self {
        let state = Arc::try_unwrap(self.state).unwrap_or_else(|_| panic!("factory already shared"));
        Self {
            state: Arc::new(FakeState {
                embedding_dimensions: Some(dimensions),
                ..state
            }),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.state.last_request.lock().unwrap().clone()
    }

    pub fn embed_calls(&self) -> usize {
        *self.state.embed_calls.lock().unwrap()
    }

    fn take_rejection(&self) -> Result<(), AiError> {
        match self.state.rejection.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ProviderFactory for FakeFactory {
    fn language_model(&self, _settings: &AiSettings) -> Result<BoxLlmProvider, AiError> {
        self.take_rejection()?;
        Ok(BoxLlmProvider::new(FakeProvider {
            state: self.state.clone(),
        }))
    }

    fn embedding_model(&self, _settings: &AiSettings) -> Result<BoxEmbedder, AiError> {
        self.take_rejection()?;
        Ok(BoxEmbedder::new(FakeEmbedder {
            state: self.state.clone(),
        }))
    }
}

struct FakeProvider {
    state: Arc<FakeState>,
}

impl FakeProvider {
    fn record(&self, request: &CompletionRequest) -> Option<LlmError> {
        *self.state.last_request.lock().unwrap() = Some(request.clone());
        self.state.failure.lock().unwrap().take()
    }
}

impl LlmProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-chat"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if let Some(err) = self.record(request) {
            return Err(err);
        }
        Ok(CompletionResponse {
            id: "fake-1".to_string(),
            content: self.state.chunks.concat(),
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }

    fn stream(&self, request: CompletionRequest) -> EventStream {
        let failure = self.record(&request);
        let mut events: Vec<Result<StreamEvent, LlmError>> = self
            .state
            .chunks
            .iter()
            .map(|text| Ok(StreamEvent::TextDelta { text: text.clone() }))
            .collect();
        match failure {
            Some(err) => events.push(Err(err)),
            None => {
                events.push(Ok(StreamEvent::MessageDelta {
                    stop_reason: StopReason::EndTurn,
                }));
                events.push(Ok(StreamEvent::Done));
            }
        }
        Box::pin(stream::iter(events))
    }
}

struct FakeEmbedder {
    state: Arc<FakeState>,
}

impl Embedder for FakeEmbedder {
    /// `[chars, 1.0, 0.0, ...]`: texts of similar length land close together.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        *self.state.embed_calls.lock().unwrap() += 1;
        let dims = self.state.embedding_dimensions.unwrap_or(EMBEDDING_DIMENSIONS);
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0; dims];
                v[0] = text.chars().count() as f32;
                v[1] = 1.0;
                v
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "fake-embed"
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm = |v: &[f32]| v.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    1.0 - dot / (norm(a) * norm(b))
}

#[derive(Default)]
pub struct InMemoryEmbeddingRepository {
    rows: Mutex<Vec<NewPageEmbedding>>,
}

impl InMemoryEmbeddingRepository {
    pub fn rows_for(&self, page_id: &Uuid) -> Vec<NewPageEmbedding> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.page.page_id == *page_id)
            .cloned()
            .collect()
    }
}

impl PageEmbeddingRepository for InMemoryEmbeddingRepository {
    async fn replace_page_embeddings(
        &self,
        page_id: &Uuid,
        rows: &[NewPageEmbedding],
    ) -> Result<u64, RepositoryError> {
        let mut stored = self.rows.lock().unwrap();
        let before = stored.len();
        stored.retain(|r| r.page.page_id != *page_id);
        let removed = before - stored.len();
        stored.extend_from_slice(rows);
        Ok(if rows.is_empty() { removed } else { rows.len() } as u64)
    }

    async fn delete_page_embeddings(&self, page_id: &Uuid) -> Result<u64, RepositoryError> {
        let mut stored = self.rows.lock().unwrap();
        let before = stored.len();
        stored.retain(|r| r.page.page_id != *page_id);
        Ok((before - stored.len()) as u64)
    }

    async fn search(&self, query: &SimilarityQuery) -> Result<Vec<EmbeddingMatch>, RepositoryError> {
        let stored = self.rows.lock().unwrap();
        let mut matches: Vec<EmbeddingMatch> = stored
            .iter()
            .filter(|r| r.page.workspace_id == query.workspace_id)
            .filter(|r| query.space_id.is_none_or(|s| r.page.space_id == s))
            .map(|r| EmbeddingMatch {
                id: r.id,
                page_id: r.page.page_id,
                space_id: r.page.space_id,
                attachment_id: r.page.attachment_id,
                chunk_index: r.chunk_index,
                chunk_start: r.chunk_start,
                chunk_length: r.chunk_length,
                model_name: r.model_name.clone(),
                distance: cosine_distance(&r.embedding, &query.embedding),
            })
            .collect();
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(query.limit as usize);
        Ok(matches)
    }
}
