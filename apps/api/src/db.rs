use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::errors::PersistenceError;

/// Builds a PostgreSQL pool without connecting. The first query opens the
/// connection, so an unreachable database only fails the database channel
/// after the file artifact has been written.
pub fn create_pool(database_url: &str) -> Result<PgPool, PersistenceError> {
    // One writer per run; a couple of connections is plenty.
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// Applies pending migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), PersistenceError> {
    info!("Applying PostgreSQL migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("PostgreSQL schema is up to date");
    Ok(())
}
