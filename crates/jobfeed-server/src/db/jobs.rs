//! PostgreSQL job repository.

use async_trait::async_trait;
use jobfeed_common::{FailureReason, JobCandidate};
use sqlx::PgPool;

use super::repository::{BulkUpsertOutcome, Job, JobRepository};

/// `(xmax = 0)` is true only for rows created by this statement, which is
/// how an upsert distinguishes insert from update without a second query.
const UPSERT_SQL: &str = r#"
    INSERT INTO jobs (
        external_id, source_url, title, description,
        company, location, link, published_at, raw
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (external_id, source_url) DO UPDATE SET
        title = EXCLUDED.title,
        description = EXCLUDED.description,
        company = EXCLUDED.company,
        location = EXCLUDED.location,
        link = EXCLUDED.link,
        published_at = EXCLUDED.published_at,
        raw = EXCLUDED.raw,
        updated_at = now()
    RETURNING (xmax = 0) AS inserted
"#;

const FIND_MANY_SQL: &str = r#"
    SELECT id, external_id, source_url, title, description,
           company, location, link, published_at, raw,
           created_at, updated_at
    FROM jobs
    WHERE source_url = $1
    ORDER BY updated_at DESC
    LIMIT $2 OFFSET $3
"#;

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn bulk_upsert(&self, records: &[JobCandidate]) -> anyhow::Result<BulkUpsertOutcome> {
        let mut outcome = BulkUpsertOutcome::default();

        // Each record is its own statement: the store evaluates every record
        // independently, so one constraint violation never aborts siblings.
        for record in records {
            let result = sqlx::query_scalar::<_, bool>(UPSERT_SQL)
                .bind(&record.external_id)
                .bind(&record.source_url)
                .bind(&record.title)
                .bind(&record.description)
                .bind(&record.company)
                .bind(&record.location)
                .bind(&record.link)
                .bind(record.published_at)
                .bind(&record.raw)
                .fetch_one(&self.pool)
                .await;

            match result {
                Ok(true) => outcome.new_jobs += 1,
                Ok(false) => outcome.updated_jobs += 1,
                Err(sqlx::Error::Database(db_err)) => {
                    outcome.failures.push(FailureReason {
                        job_id: Some(record.external_id.clone()),
                        reason: db_err.message().to_string(),
                        code: db_err.code().map(|code| code.into_owned()),
                    });
                }
                // connection-level failure: abort the call, the unit retries
                Err(other) => return Err(other.into()),
            }
        }

        Ok(outcome)
    }

    async fn find_many(
        &self,
        source_url: &str,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(FIND_MANY_SQL)
            .bind(source_url)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }
}
