//! PostgreSQL connection pool with embedded migrations.

use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Migrations under the workspace `migrations/` directory, embedded at build time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

#[derive(Clone)]
pub struct DatabasePool {
    pub pool: PgPool,
}

impl DatabasePool {
    /// Connect and run pending migrations.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = pool_options().connect(database_url).await?;
        MIGRATOR.run(&pool).await?;
        Ok(Self { pool })
    }

    /// Build a pool that opens connections on first use. Nothing is migrated.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = pool_options().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Run pending migrations on an existing pool.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}
