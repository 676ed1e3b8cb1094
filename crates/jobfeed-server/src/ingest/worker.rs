//! Consumer side: process one work unit to completion.
//!
//! A unit runs as a whole: upsert every candidate, then append exactly one
//! import log entry. There is no mid-unit cancellation; progress lost to a
//! crash is safe to redo because the upsert is idempotent, and redelivery
//! is the queue backend's job.

use std::sync::Arc;

use apalis::prelude::Data;
use tracing::{info, instrument};

use super::jobs::{ImportWorkUnit, UpsertStats};
use super::upsert::UpsertEngine;
use crate::db::repository::{ImportLogRepository, NewImportLog};

/// Everything a consumer needs, constructed explicitly at startup and
/// shared across worker slots.
pub struct ConsumerContext {
    pub engine: UpsertEngine,
    pub logs: Arc<dyn ImportLogRepository>,
}

impl ConsumerContext {
    pub fn new(engine: UpsertEngine, logs: Arc<dyn ImportLogRepository>) -> Self {
        Self { engine, logs }
    }

    /// Upsert the unit's candidates and append its audit entry.
    #[instrument(skip_all, fields(source_url = %unit.source_url, run_id = %unit.run_id))]
    pub async fn handle_unit(&self, unit: &ImportWorkUnit) -> anyhow::Result<UpsertStats> {
        let total_fetched = unit.total_fetched();
        let stats = self.engine.apply(&unit.jobs).await?;

        self.logs
            .insert(NewImportLog {
                source_url: unit.source_url.clone(),
                run_id: unit.run_id.clone(),
                chunk_index: unit.chunk_index.map(|index| index as i32),
                total_chunks: unit.total_chunks.map(|total| total as i32),
                total_fetched: total_fetched as i32,
                total_imported: stats.total_imported() as i32,
                new_jobs: stats.new_jobs as i32,
                updated_jobs: stats.updated_jobs as i32,
                failed_jobs: stats.failed_jobs as i32,
                failure_reasons: stats.failure_reasons.clone(),
            })
            .await?;

        info!(
            total_fetched,
            new = stats.new_jobs,
            updated = stats.updated_jobs,
            failed = stats.failed_jobs,
            chunk = ?unit.chunk_index,
            "import unit completed"
        );

        Ok(stats)
    }
}

/// Apalis entry point for one delivered unit.
pub async fn process_import_unit(
    unit: ImportWorkUnit,
    context: Data<Arc<ConsumerContext>>,
) -> anyhow::Result<()> {
    context.handle_unit(&unit).await?;
    Ok(())
}
