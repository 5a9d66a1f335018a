use std::sync::Arc;

use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    config::AppConfig,
    store::{MemoryStore, PgStore, Store},
};

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Applies the SQL files in `migrations/` that have not run yet.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Opens the store selected by `DATABASE_URL`. The caller owns the handle and
/// is expected to `close` it on shutdown.
pub async fn open_store(config: &AppConfig) -> Result<Store> {
    if config.uses_memory_store() {
        tracing::warn!("using in-memory document store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    tracing::info!(namespace = %config.db_name, "connected to postgres document store");
    Ok(Arc::new(PgStore::new(pool, config.db_name.clone())))
}
