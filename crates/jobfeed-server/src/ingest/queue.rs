//! Chunking and submission of import work units.
//!
//! The queue backend (apalis over PostgreSQL) is a black box providing
//! at-least-once delivery and its own bounded retry with exponential
//! backoff. Chunks are submitted independently: consumers may run them
//! concurrently and out of submission order, and nothing here waits on
//! completion.

use apalis::prelude::*;
use apalis_postgres::PostgresStorage;
use chrono::Utc;
use jobfeed_common::{ImportError, JobCandidate};
use sqlx::PgPool;
use tracing::debug;

use super::jobs::ImportWorkUnit;
use crate::config::QueueConfig;

/// What a submission produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnqueueReceipt {
    /// Backend id of the first submitted unit, if any
    pub first_unit_id: Option<String>,
    pub chunk_count: usize,
    pub total_jobs: usize,
}

/// Split one fetch's candidate list into consecutive, non-overlapping,
/// order-preserving work units.
///
/// Lists at or under `chunk_size` become a single unit with no chunk
/// metadata; larger lists get 0-based `chunk_index` and a shared
/// `total_chunks`. An empty list yields no units.
pub fn chunk_candidates(
    source_url: &str,
    run_id: &str,
    candidates: Vec<JobCandidate>,
    chunk_size: usize,
) -> Vec<ImportWorkUnit> {
    let total = candidates.len();
    if total == 0 {
        return Vec::new();
    }

    if total <= chunk_size {
        return vec![ImportWorkUnit {
            source_url: source_url.to_string(),
            run_id: run_id.to_string(),
            chunk_index: None,
            total_chunks: None,
            jobs: candidates,
        }];
    }

    let total_chunks = total.div_ceil(chunk_size) as u32;
    candidates
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, window)| ImportWorkUnit {
            source_url: source_url.to_string(),
            run_id: run_id.to_string(),
            chunk_index: Some(index as u32),
            total_chunks: Some(total_chunks),
            jobs: window.to_vec(),
        })
        .collect()
}

/// Producer-side handle to the import queue.
///
/// Owns an explicitly constructed storage backend; there is no lazy
/// module-level connection. `setup` and construction are lifecycle steps
/// performed once at process startup.
#[derive(Clone)]
pub struct ImportQueue {
    storage: PostgresStorage<ImportWorkUnit>,
    pool: PgPool,
    config: QueueConfig,
}

impl ImportQueue {
    /// Run the backend's schema migrations. Call once before `new`.
    pub async fn setup(pool: &PgPool) -> anyhow::Result<()> {
        PostgresStorage::setup(pool).await?;
        Ok(())
    }

    pub fn new(pool: PgPool, config: QueueConfig) -> Self {
        let storage = PostgresStorage::new(&pool);
        Self {
            storage,
            pool,
            config,
        }
    }

    /// The storage backend consumers attach their workers to.
    pub fn storage(&self) -> PostgresStorage<ImportWorkUnit> {
        self.storage.clone()
    }

    /// Submit one fetch's candidates as one or more work units sharing a
    /// run id. Zero candidates is a no-op. Submission failures are
    /// classified once and propagate unmodified; there is no retry here.
    pub async fn enqueue(
        &self,
        source_url: &str,
        candidates: Vec<JobCandidate>,
    ) -> jobfeed_common::Result<EnqueueReceipt> {
        let total_jobs = candidates.len();
        if total_jobs == 0 {
            return Ok(EnqueueReceipt::default());
        }

        self.prune_finished().await;

        let run_id = format!("{source_url}|{}", Utc::now().timestamp_millis());
        let units = chunk_candidates(source_url, &run_id, candidates, self.config.chunk_size);
        let chunk_count = units.len();

        let mut storage = self.storage.clone();
        let mut first_unit_id = None;
        for unit in units {
            let parts = storage.push(unit).await.map_err(classify_queue_error)?;
            if first_unit_id.is_none() {
                first_unit_id = Some(parts.task_id.to_string());
            }
        }

        debug!(source_url, run_id, chunk_count, total_jobs, "units enqueued");

        Ok(EnqueueReceipt {
            first_unit_id,
            chunk_count,
            total_jobs,
        })
    }

    /// Best-effort removal of old completed/failed queue bookkeeping.
    /// Failures here are swallowed; they must never block a submission.
    async fn prune_finished(&self) {
        let cutoff = Utc::now() - chrono::Duration::seconds(self.config.prune_grace_secs);
        let result = sqlx::query(
            r#"
            DELETE FROM apalis.jobs
            WHERE id IN (
                SELECT id FROM apalis.jobs
                WHERE status IN ('Done', 'Failed') AND done_at < $1
                LIMIT $2
            )
            "#,
        )
        .bind(cutoff)
        .bind(self.config.prune_limit)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => debug!(pruned = done.rows_affected(), "queue bookkeeping pruned"),
            Err(err) => debug!(error = %err, "queue bookkeeping prune failed, continuing"),
        }
    }
}

/// Map a backend submission failure onto the closed error taxonomy. This is
/// the one place backend error codes are interpreted.
fn classify_queue_error(err: sqlx::Error) -> ImportError {
    if let sqlx::Error::Database(db_err) = &err {
        // insufficient-resources class: disk full, out of memory
        if matches!(db_err.code().as_deref(), Some("53100") | Some("53200")) {
            return ImportError::QueueCapacity(db_err.message().to_string());
        }
    }
    ImportError::QueueUnavailable(err.to_string())
}
