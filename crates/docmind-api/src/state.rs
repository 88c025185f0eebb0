//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/factory traits, but AppState pins
//! them to the concrete infra implementations.

use std::collections::HashSet;
use std::sync::Arc;

use docmind_core::ai::service::AiService;
use docmind_core::embedding::service::EmbeddingService;
use docmind_infra::config::AppConfig;
use docmind_infra::llm::DriverProviderFactory;
use docmind_infra::postgres::api_key::PgApiKeyStore;
use docmind_infra::postgres::embedding::PgPageEmbeddingRepository;
use docmind_infra::postgres::pool::DatabasePool;
use docmind_types::ai::AiSettings;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAiService = AiService<DriverProviderFactory>;

pub type ConcreteEmbeddingService =
    EmbeddingService<PgPageEmbeddingRepository, DriverProviderFactory>;

/// AI service over the driver-selected providers. Needs no database.
pub fn build_ai_service(settings: &AiSettings) -> ConcreteAiService {
    AiService::new(Arc::new(settings.clone()), DriverProviderFactory)
}

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<ConcreteAiService>,
    pub embeddings: Arc<ConcreteEmbeddingService>,
    /// SHA-256 hashes of the API keys accepted by the REST API.
    pub api_keys: Arc<HashSet<String>>,
}

impl AppState {
    /// Wire services around an existing pool.
    pub fn from_parts(config: &AppConfig, db_pool: DatabasePool, api_keys: HashSet<String>) -> Self {
        let ai = Arc::new(build_ai_service(&config.ai));
        let embeddings =
            EmbeddingService::new(PgPageEmbeddingRepository::new(db_pool), ai.clone());

        Self {
            ai,
            embeddings: Arc::new(embeddings),
            api_keys: Arc::new(api_keys),
        }
    }

    /// Connect to the database (running migrations) and load the API key hashes.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(config.require_database_url()?).await?;
        let api_keys = PgApiKeyStore::new(db_pool.clone()).load_hashes().await?;
        tracing::info!(keys = api_keys.len(), "API keys loaded");

        Ok(Self::from_parts(config, db_pool, api_keys))
    }
}
