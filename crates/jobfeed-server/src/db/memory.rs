//! In-memory repository implementations for tests.
//!
//! `MemoryJobRepository` enforces the same observable contract as the
//! Postgres implementation: keyed replace on `(external_id, source_url)`,
//! per-record failure isolation, insert-vs-update reporting.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use jobfeed_common::{FailureReason, JobCandidate};
use uuid::Uuid;

use super::repository::{
    BulkUpsertOutcome, ImportLog, ImportLogRepository, Job, JobRepository, JobSource,
    NewImportLog, SourceRepository,
};

#[derive(Default)]
pub struct MemoryJobRepository {
    records: Mutex<HashMap<(String, String), JobCandidate>>,
    /// external ids whose writes fail with a simulated constraint violation
    failing_ids: HashSet<String>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            failing_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn stored_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn stored(&self, external_id: &str, source_url: &str) -> Option<JobCandidate> {
        self.records
            .lock()
            .unwrap()
            .get(&(external_id.to_string(), source_url.to_string()))
            .cloned()
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn bulk_upsert(&self, records: &[JobCandidate]) -> anyhow::Result<BulkUpsertOutcome> {
        let mut outcome = BulkUpsertOutcome::default();
        let mut store = self.records.lock().unwrap();

        for record in records {
            if self.failing_ids.contains(&record.external_id) {
                outcome.failures.push(FailureReason {
                    job_id: Some(record.external_id.clone()),
                    reason: "simulated constraint violation".to_string(),
                    code: Some("23505".to_string()),
                });
                continue;
            }
            let key = (record.external_id.clone(), record.source_url.clone());
            if store.insert(key, record.clone()).is_some() {
                outcome.updated_jobs += 1;
            } else {
                outcome.new_jobs += 1;
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
        let store = self.records.lock().unwrap();
        let now = chrono::Utc::now();
        let jobs = store
            .values()
            .filter(|record| record.source_url == source_url)
            .skip(offset as usize)
            .take(limit as usize)
            .map(|record| Job {
                id: Uuid::new_v4(),
                external_id: record.external_id.clone(),
                source_url: record.source_url.clone(),
                title: record.title.clone(),
                description: record.description.clone(),
                company: record.company.clone(),
                location: record.location.clone(),
                link: record.link.clone(),
                published_at: record.published_at,
                raw: record.raw.clone(),
                created_at: now,
                updated_at: now,
            })
            .collect();
        Ok(jobs)
    }
}

#[derive(Default)]
pub struct MemoryImportLogRepository {
    entries: Mutex<Vec<NewImportLog>>,
}

impl MemoryImportLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<NewImportLog> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImportLogRepository for MemoryImportLogRepository {
    async fn insert(&self, entry: NewImportLog) -> anyhow::Result<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    async fn find_filtered(
        &self,
        source_url: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<ImportLog>> {
        let entries = self.entries.lock().unwrap();
        let logs = entries
            .iter()
            .rev()
            .filter(|entry| source_url.is_none_or(|src| entry.source_url == src))
            .skip(offset as usize)
            .take(limit as usize)
            .enumerate()
            .map(|(idx, entry)| ImportLog {
                id: idx as i64,
                source_url: entry.source_url.clone(),
                run_id: entry.run_id.clone(),
                chunk_index: entry.chunk_index,
                total_chunks: entry.total_chunks,
                timestamp: chrono::Utc::now(),
                total_fetched: entry.total_fetched,
                total_imported: entry.total_imported,
                new_jobs: entry.new_jobs,
                updated_jobs: entry.updated_jobs,
                failed_jobs: entry.failed_jobs,
                failure_reasons: sqlx::types::Json(entry.failure_reasons.clone()),
            })
            .collect();
        Ok(logs)
    }

    async fn count_filtered(&self, source_url: Option<&str>) -> anyhow::Result<i64> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .filter(|entry| source_url.is_none_or(|src| entry.source_url == src))
            .count() as i64)
    }
}

#[derive(Default)]
pub struct MemorySourceRepository {
    sources: Mutex<Vec<JobSource>>,
}

impl MemorySourceRepository {
    pub fn with_sources(urls: &[&str]) -> Self {
        let now = chrono::Utc::now();
        let sources = urls
            .iter()
            .map(|url| JobSource {
                id: Uuid::new_v4(),
                url: url.to_string(),
                name: String::new(),
                enabled: true,
                last_fetched_at: None,
                created_at: now,
                updated_at: now,
            })
            .collect();
        Self {
            sources: Mutex::new(sources),
        }
    }
}

#[async_trait]
impl SourceRepository for MemorySourceRepository {
    async fn list(&self) -> anyhow::Result<Vec<JobSource>> {
        Ok(self.sources.lock().unwrap().clone())
    }

    async fn list_enabled(&self) -> anyhow::Result<Vec<JobSource>> {
        Ok(self
            .sources
            .lock()
            .unwrap()
            .iter()
            .filter(|source| source.enabled)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<JobSource>> {
        Ok(self
            .sources
            .lock()
            .unwrap()
            .iter()
            .find(|source| source.id == id)
            .cloned())
    }

    async fn create(&self, url: &str, name: &str) -> anyhow::Result<JobSource> {
        let now = chrono::Utc::now();
        let source = JobSource {
            id: Uuid::new_v4(),
            url: url.to_string(),
            name: name.to_string(),
            enabled: true,
            last_fetched_at: None,
            created_at: now,
            updated_at: now,
        };
        self.sources.lock().unwrap().push(source.clone());
        Ok(source)
    }

    async fn mark_fetched(&self, id: Uuid) -> anyhow::Result<()> {
        let mut sources = self.sources.lock().unwrap();
        if let Some(source) = sources.iter_mut().find(|source| source.id == id) {
            source.last_fetched_at = Some(chrono::Utc::now());
        }
        Ok(())
    }
}
