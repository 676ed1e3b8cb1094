//! PostgreSQL import log repository. Insert and read only; the audit trail
//! is never updated or deleted.

use async_trait::async_trait;
use sqlx::PgPool;

use super::repository::{ImportLog, ImportLogRepository, NewImportLog};

const INSERT_SQL: &str = r#"
    INSERT INTO import_logs (
        source_url, run_id, chunk_index, total_chunks,
        total_fetched, total_imported, new_jobs, updated_jobs,
        failed_jobs, failure_reasons
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
"#;

const SELECT_COLUMNS: &str = r#"
    SELECT id, source_url, run_id, chunk_index, total_chunks,
           timestamp, total_fetched, total_imported, new_jobs,
           updated_jobs, failed_jobs, failure_reasons
    FROM import_logs
"#;

pub struct PgImportLogRepository {
    pool: PgPool,
}

impl PgImportLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportLogRepository for PgImportLogRepository {
    async fn insert(&self, entry: NewImportLog) -> anyhow::Result<()> {
        sqlx::query(INSERT_SQL)
            .bind(&entry.source_url)
            .bind(&entry.run_id)
            .bind(entry.chunk_index)
            .bind(entry.total_chunks)
            .bind(entry.total_fetched)
            .bind(entry.total_imported)
            .bind(entry.new_jobs)
            .bind(entry.updated_jobs)
            .bind(entry.failed_jobs)
            .bind(sqlx::types::Json(&entry.failure_reasons))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_filtered(
        &self,
        source_url: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<ImportLog>> {
        let logs = match source_url {
            Some(source) => {
                let sql = format!(
                    "{SELECT_COLUMNS} WHERE source_url = $1 \
                     ORDER BY timestamp DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, ImportLog>(&sql)
                    .bind(source)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{SELECT_COLUMNS} ORDER BY timestamp DESC LIMIT $1 OFFSET $2");
                sqlx::query_as::<_, ImportLog>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(logs)
    }

    async fn count_filtered(&self, source_url: Option<&str>) -> anyhow::Result<i64> {
        let count = match source_url {
            Some(source) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM import_logs WHERE source_url = $1",
                )
                .bind(source)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM import_logs")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }
}
