//! PostgreSQL storage layer.
//!
//! Repository implementations backed by a `sqlx` PostgreSQL pool, with
//! vector search delegated to the `pgvector` extension.

pub mod api_key;
pub mod embedding;
pub mod pool;
