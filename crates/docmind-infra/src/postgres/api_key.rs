//! API key minting and lookup.
//!
//! Only SHA-256 hashes are stored; the plaintext key is shown once at
//! creation time.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use docmind_types::error::RepositoryError;

use super::pool::DatabasePool;

pub const API_KEY_PREFIX: &str = "dmk_";

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

/// Mint a new plaintext key: the prefix followed by 64 random hex characters.
pub fn generate_api_key() -> String {
    format!(
        "{API_KEY_PREFIX}{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// A freshly created key. `key` is the only copy of the plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedApiKey {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
}

pub struct PgApiKeyStore {
    pool: DatabasePool,
}

impl PgApiKeyStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Hashes of every stored key.
    pub async fn load_hashes(&self) -> Result<HashSet<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT key_hash FROM api_keys")
            .fetch_all(&self.pool.pool)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(rows.into_iter().map(|(hash,)| hash).collect())
    }

    /// Mint a key, store its hash under `name`, and return the plaintext.
    pub async fn create(&self, name: &str) -> Result<CreatedApiKey, RepositoryError> {
        let created = CreatedApiKey {
            id: Uuid::now_v7(),
            name: name.to_string(),
            key: generate_api_key(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO api_keys (id, name, key_hash, created_at) VALUES ($1, $2, $3, $4)")
            .bind(created.id)
            .bind(&created.name)
            .bind(hash_api_key(&created.key))
            .bind(created.created_at)
            .execute(&self.pool.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::Conflict(db.message().to_string())
                }
                other => RepositoryError::Query(other.to_string()),
            })?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_known_value() {
        assert_eq!(
            hash_api_key(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_generated_keys_are_prefixed_and_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert!(a.starts_with(API_KEY_PREFIX));
        assert_eq!(a.len(), API_KEY_PREFIX.len() + 64);
        assert!(a[API_KEY_PREFIX.len()..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
        assert_ne!(hash_api_key(&a), hash_api_key(&b));
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server with pgvector; set DATABASE_URL"]
    async fn test_create_then_load() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let store = PgApiKeyStore::new(DatabasePool::new(&url).await.unwrap());

        let created = store.create("ci").await.unwrap();
        let hashes = store.load_hashes().await.unwrap();
        assert!(hashes.contains(&hash_api_key(&created.key)));
    }
}
