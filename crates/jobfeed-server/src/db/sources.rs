//! PostgreSQL feed source repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repository::{JobSource, SourceRepository};

const SELECT_COLUMNS: &str = r#"
    SELECT id, url, name, enabled, last_fetched_at, created_at, updated_at
    FROM job_sources
"#;

pub struct PgSourceRepository {
    pool: PgPool,
}

impl PgSourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SourceRepository for PgSourceRepository {
    async fn list(&self) -> anyhow::Result<Vec<JobSource>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC");
        let sources = sqlx::query_as::<_, JobSource>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(sources)
    }

    async fn list_enabled(&self) -> anyhow::Result<Vec<JobSource>> {
        let sql = format!("{SELECT_COLUMNS} WHERE enabled ORDER BY created_at");
        let sources = sqlx::query_as::<_, JobSource>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(sources)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<JobSource>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = $1");
        let source = sqlx::query_as::<_, JobSource>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(source)
    }

    async fn create(&self, url: &str, name: &str) -> anyhow::Result<JobSource> {
        let source = sqlx::query_as::<_, JobSource>(
            r#"
            INSERT INTO job_sources (url, name)
            VALUES ($1, $2)
            RETURNING id, url, name, enabled, last_fetched_at, created_at, updated_at
            "#,
        )
        .bind(url.trim())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(source)
    }

    async fn mark_fetched(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE job_sources SET last_fetched_at = now(), updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
