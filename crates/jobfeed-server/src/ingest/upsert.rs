//! Idempotent bulk persistence of one unit's candidates.

use std::sync::Arc;

use jobfeed_common::JobCandidate;
use tracing::debug;

use super::jobs::UpsertStats;
use crate::db::repository::JobRepository;

/// Applies a unit's job list to the store in bounded sub-batches.
///
/// Each sub-batch is one unordered bulk insert-or-replace keyed by
/// `(external_id, source_url)`: absent keys insert, present keys are fully
/// overwritten. The repository reports per-record failures as data, so one
/// bad record never aborts its siblings, in this sub-batch or any other.
/// Re-applying an already-applied unit resolves every record to "update",
/// which makes at-least-once delivery safe.
pub struct UpsertEngine {
    repo: Arc<dyn JobRepository>,
    batch_size: usize,
    max_failure_reasons: usize,
}

impl UpsertEngine {
    pub fn new(repo: Arc<dyn JobRepository>, batch_size: usize, max_failure_reasons: usize) -> Self {
        Self {
            repo,
            batch_size: batch_size.max(1),
            max_failure_reasons,
        }
    }

    /// Upsert every candidate, aggregating counts across sub-batches.
    /// The failure-reason list truncates at the configured cap; the counts
    /// never do.
    pub async fn apply(&self, jobs: &[JobCandidate]) -> anyhow::Result<UpsertStats> {
        let mut stats = UpsertStats::default();

        for batch in jobs.chunks(self.batch_size) {
            let outcome = self.repo.bulk_upsert(batch).await?;

            stats.new_jobs += outcome.new_jobs;
            stats.updated_jobs += outcome.updated_jobs;
            stats.failed_jobs += outcome.failures.len() as u64;

            let room = self
                .max_failure_reasons
                .saturating_sub(stats.failure_reasons.len());
            stats
                .failure_reasons
                .extend(outcome.failures.into_iter().take(room));
        }

        debug!(
            new = stats.new_jobs,
            updated = stats.updated_jobs,
            failed = stats.failed_jobs,
            "unit upsert finished"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryJobRepository;

    const SOURCE: &str = "https://feed.example/jobs.rss";

    fn candidate(id: &str, title: &str) -> JobCandidate {
        JobCandidate {
            external_id: id.to_string(),
            source_url: SOURCE.to_string(),
            title: title.to_string(),
            description: String::new(),
            company: String::new(),
            location: String::new(),
            link: String::new(),
            published_at: None,
            raw: serde_json::Value::Null,
        }
    }

    fn engine(repo: Arc<MemoryJobRepository>) -> UpsertEngine {
        UpsertEngine::new(repo, 500, 500)
    }

    #[tokio::test]
    async fn three_new_entries_import_as_new() {
        let repo = Arc::new(MemoryJobRepository::new());
        let jobs = vec![
            candidate("a", "One"),
            candidate("b", "Two"),
            candidate("c", "Three"),
        ];

        let stats = engine(repo.clone()).apply(&jobs).await.unwrap();

        assert_eq!(stats.new_jobs, 3);
        assert_eq!(stats.updated_jobs, 0);
        assert_eq!(stats.failed_jobs, 0);
        assert_eq!(stats.total_imported(), 3);
        assert_eq!(repo.stored_count(), 3);
    }

    #[tokio::test]
    async fn reapplying_an_applied_unit_is_idempotent() {
        let repo = Arc::new(MemoryJobRepository::new());
        let engine = engine(repo.clone());
        let jobs = vec![candidate("a", "One"), candidate("b", "Two")];

        let first = engine.apply(&jobs).await.unwrap();
        assert_eq!(first.new_jobs, 2);

        // unchanged unit, delivered again
        let second = engine.apply(&jobs).await.unwrap();
        assert_eq!(second.new_jobs, 0);
        assert_eq!(second.updated_jobs, 2);
        assert_eq!(second.failed_jobs, 0);
        assert_eq!(repo.stored_count(), 2);

        // and again: still equivalent to a single application
        let third = engine.apply(&jobs).await.unwrap();
        assert_eq!(third.updated_jobs, 2);
        assert_eq!(repo.stored_count(), 2);
    }

    #[tokio::test]
    async fn replays_reflect_the_latest_payload() {
        let repo = Arc::new(MemoryJobRepository::new());
        let engine = engine(repo.clone());

        engine.apply(&[candidate("a", "Old title")]).await.unwrap();
        engine.apply(&[candidate("a", "New title")]).await.unwrap();

        let stored = repo.stored("a", SOURCE).unwrap();
        assert_eq!(stored.title, "New title");
        assert_eq!(repo.stored_count(), 1);
    }

    #[tokio::test]
    async fn retrigger_with_overlap_counts_new_and_updated() {
        let repo = Arc::new(MemoryJobRepository::new());
        let engine = engine(repo.clone());

        engine
            .apply(&[
                candidate("a", "One"),
                candidate("b", "Two"),
                candidate("c", "Three"),
            ])
            .await
            .unwrap();

        // two known ids plus one new
        let stats = engine
            .apply(&[
                candidate("a", "One"),
                candidate("b", "Two"),
                candidate("d", "Four"),
            ])
            .await
            .unwrap();

        assert_eq!(stats.new_jobs, 1);
        assert_eq!(stats.updated_jobs, 2);
        assert_eq!(repo.stored_count(), 4);
    }

    #[tokio::test]
    async fn one_failing_record_never_blocks_siblings() {
        let repo = Arc::new(MemoryJobRepository::failing_on(["bad"]));
        let engine = UpsertEngine::new(repo.clone(), 2, 500);

        // "bad" sits mid-list, inside a sub-batch with a healthy sibling
        let jobs = vec![
            candidate("a", "One"),
            candidate("bad", "Broken"),
            candidate("b", "Two"),
            candidate("c", "Three"),
        ];

        let stats = engine.apply(&jobs).await.unwrap();

        assert_eq!(stats.new_jobs, 3);
        assert_eq!(stats.failed_jobs, 1);
        assert_eq!(stats.total_imported(), 3);
        assert_eq!(stats.failure_reasons.len(), 1);
        assert_eq!(stats.failure_reasons[0].job_id.as_deref(), Some("bad"));
        assert_eq!(stats.failure_reasons[0].code.as_deref(), Some("23505"));
        assert_eq!(repo.stored_count(), 3);
    }

    #[tokio::test]
    async fn counts_cover_every_evaluated_record() {
        let repo = Arc::new(MemoryJobRepository::failing_on(["x", "y"]));
        let engine = UpsertEngine::new(repo, 3, 500);

        let jobs = vec![
            candidate("a", "One"),
            candidate("x", "Bad"),
            candidate("b", "Two"),
            candidate("y", "Bad"),
            candidate("c", "Three"),
        ];

        let stats = engine.apply(&jobs).await.unwrap();
        assert_eq!(stats.total_evaluated(), jobs.len() as u64);
        assert_eq!(stats.total_imported(), stats.new_jobs + stats.updated_jobs);
    }

    #[tokio::test]
    async fn failure_reasons_cap_while_counts_keep_accumulating() {
        let failing: Vec<String> = (0..10).map(|n| format!("bad-{n}")).collect();
        let repo = Arc::new(MemoryJobRepository::failing_on(failing.clone()));
        let engine = UpsertEngine::new(repo, 3, 4);

        let jobs: Vec<_> = failing
            .iter()
            .map(|id| candidate(id, "Broken"))
            .collect();

        let stats = engine.apply(&jobs).await.unwrap();
        assert_eq!(stats.failed_jobs, 10);
        assert_eq!(stats.failure_reasons.len(), 4);
    }
}
