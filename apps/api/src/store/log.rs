//! Database channel of the ResultStore: an append-only log of records.
//!
//! Every successful run adds one row. Nothing is deduplicated; the file
//! channel is where "latest only" lives.

use std::path::Path;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::run_migrations;
use crate::errors::PersistenceError;
use crate::models::record::{ExtractedRecordRow, StructuredRecord};
use crate::store::file::FileStore;

#[async_trait]
pub trait RecordLog: Send + Sync {
    /// Inserts one document. Never updates an existing row.
    async fn append(
        &self,
        record: &StructuredRecord,
        source_path: &Path,
    ) -> Result<ExtractedRecordRow, PersistenceError>;

    async fn count(&self) -> Result<i64, PersistenceError>;
}

/// `RecordLog` over the `extracted_text` table. Migrations run once, on
/// first use.
#[derive(Clone)]
pub struct PgRecordLog {
    pool: PgPool,
    migrated: Arc<OnceCell<()>>,
}

impl PgRecordLog {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            migrated: Arc::new(OnceCell::new()),
        }
    }

    async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        self.migrated
            .get_or_try_init(|| run_migrations(&self.pool))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RecordLog for PgRecordLog {
    async fn append(
        &self,
        record: &StructuredRecord,
        source_path: &Path,
    ) -> Result<ExtractedRecordRow, PersistenceError> {
        self.ensure_schema().await?;
        let row = sqlx::query_as::<_, ExtractedRecordRow>(
            r#"
            INSERT INTO extracted_text (id, data, source_path)
            VALUES ($1, $2, $3)
            RETURNING id, data, source_path, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(serde_json::Value::Object(record.as_map().clone()))
        .bind(source_path.to_string_lossy().into_owned())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count(&self) -> Result<i64, PersistenceError> {
        self.ensure_schema().await?;
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM extracted_text")
            .fetch_one(&self.pool)
            .await?)
    }
}

/// Loads the file artifact just written and appends it to `log`.
///
/// A missing, corrupt, non-object or empty file is a warning and a no-op
/// (`Ok(None)`); only the insert itself can fail.
pub async fn upsert_from_file(
    file: &FileStore,
    source_path: &Path,
    log: &dyn RecordLog,
) -> Result<Option<ExtractedRecordRow>, PersistenceError> {
    let record = match file.load().await {
        Ok(record) => record,
        Err(e) => {
            warn!("Skipping database insert, artifact is unusable: {e}");
            return Ok(None);
        }
    };
    if record.is_empty() {
        warn!("Skipping database insert, artifact is an empty object");
        return Ok(None);
    }

    let row = log.append(&record, source_path).await?;
    info!("Inserted structured record {} into extracted_text", row.id);
    Ok(Some(row))
}
