//! Repository interfaces and row types.
//!
//! Plain data structs plus store-agnostic traits: the upsert engine and
//! log recorder depend on these, never on a concrete driver. Connection
//! failures surface as errors; per-record write failures are data, carried
//! inside [`BulkUpsertOutcome`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobfeed_common::{FailureReason, JobCandidate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted job record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub external_id: String,
    pub source_url: String,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub raw: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of one bulk upsert call over a sub-batch.
///
/// Counts cover every evaluated record:
/// `new_jobs + updated_jobs + failures.len() == records.len()`.
#[derive(Debug, Clone, Default)]
pub struct BulkUpsertOutcome {
    pub new_jobs: u64,
    pub updated_jobs: u64,
    pub failures: Vec<FailureReason>,
}

/// Store of persisted jobs keyed by `(external_id, source_url)`.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert-or-replace each record independently. A record that violates
    /// a constraint is reported in the outcome and never aborts siblings;
    /// only store-level failures (connection, timeout) return `Err`.
    async fn bulk_upsert(&self, records: &[JobCandidate]) -> anyhow::Result<BulkUpsertOutcome>;

    /// Jobs for one source, most recently updated first.
    async fn find_many(
        &self,
        source_url: &str,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Job>>;
}

/// One appended audit entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImportLog {
    pub id: i64,
    pub source_url: String,
    pub run_id: String,
    pub chunk_index: Option<i32>,
    pub total_chunks: Option<i32>,
    pub timestamp: DateTime<Utc>,
    pub total_fetched: i32,
    pub total_imported: i32,
    pub new_jobs: i32,
    pub updated_jobs: i32,
    pub failed_jobs: i32,
    pub failure_reasons: sqlx::types::Json<Vec<FailureReason>>,
}

/// Fields of a log entry about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImportLog {
    pub source_url: String,
    pub run_id: String,
    pub chunk_index: Option<i32>,
    pub total_chunks: Option<i32>,
    pub total_fetched: i32,
    pub total_imported: i32,
    pub new_jobs: i32,
    pub updated_jobs: i32,
    pub failed_jobs: i32,
    pub failure_reasons: Vec<FailureReason>,
}

/// Append-only audit trail of consumed work units.
#[async_trait]
pub trait ImportLogRepository: Send + Sync {
    /// Append one entry. Entries are never updated or deleted.
    async fn insert(&self, entry: NewImportLog) -> anyhow::Result<()>;

    /// Entries in reverse-chronological order, optionally filtered by source.
    async fn find_filtered(
        &self,
        source_url: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<ImportLog>>;

    /// Total entries matching the same filter.
    async fn count_filtered(&self, source_url: Option<&str>) -> anyhow::Result<i64>;
}

/// A registered feed source.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobSource {
    pub id: Uuid,
    pub url: String,
    pub name: String,
    pub enabled: bool,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registry of feed sources the importer knows about.
#[async_trait]
pub trait SourceRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<JobSource>>;

    async fn list_enabled(&self) -> anyhow::Result<Vec<JobSource>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<JobSource>>;

    async fn create(&self, url: &str, name: &str) -> anyhow::Result<JobSource>;

    async fn mark_fetched(&self, id: Uuid) -> anyhow::Result<()>;
}
