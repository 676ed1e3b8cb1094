//! Worker pool and cron wiring on top of the apalis backend.

use std::str::FromStr;
use std::sync::Arc;

use apalis::prelude::*;
use apalis_cron::{CronStream, Schedule};
use chrono::{DateTime, Utc};
use tracing::info;

use super::pipeline::ImportPipeline;
use super::queue::ImportQueue;
use super::worker::{process_import_unit, ConsumerContext};

/// Bounded pool of import consumers in this process.
///
/// Every slot is a named worker pulling from the shared backend, so two
/// slots (or two whole processes) may hold different chunks of the same
/// run with no ordering between them. Delivery retries belong to the
/// backend's retry policy, not to the unit handler.
pub struct ImportWorkerPool {
    queue: ImportQueue,
    context: Arc<ConsumerContext>,
    concurrency: usize,
    max_attempts: usize,
}

impl ImportWorkerPool {
    pub fn new(
        queue: ImportQueue,
        context: Arc<ConsumerContext>,
        concurrency: usize,
        max_attempts: usize,
    ) -> Self {
        Self {
            queue,
            context,
            concurrency: concurrency.max(1),
            max_attempts,
        }
    }

    /// Run consumers until shutdown.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(slots = self.concurrency, "import worker pool starting");

        let mut monitor = Monitor::new();
        for slot in 0..self.concurrency {
            let storage = self.queue.storage();
            let context = self.context.clone();
            let max_attempts = self.max_attempts;
            monitor = monitor.register(move |_index| {
                WorkerBuilder::new(format!("jobfeed-import-{slot}"))
                    .retry(RetryPolicy::retries(max_attempts))
                    .data(context.clone())
                    .backend(storage.clone())
                    .build(process_import_unit)
            });
        }

        monitor.run().await?;
        info!("import worker pool stopped");
        Ok(())
    }
}

/// One firing of the periodic import schedule.
#[derive(Debug, Clone)]
pub struct ImportTick(DateTime<Utc>);

impl From<DateTime<Utc>> for ImportTick {
    fn from(timestamp: DateTime<Utc>) -> Self {
        Self(timestamp)
    }
}

async fn run_scheduled_tick(tick: ImportTick, pipeline: Data<Arc<ImportPipeline>>) {
    info!(fired_at = %tick.0, "cron tick fired");
    pipeline.run_tick().await;
}

/// Run the periodic producer until shutdown.
pub async fn run_import_cron(
    schedule_expr: &str,
    pipeline: Arc<ImportPipeline>,
) -> anyhow::Result<()> {
    let schedule = Schedule::from_str(schedule_expr)
        .map_err(|err| anyhow::anyhow!("invalid cron schedule '{schedule_expr}': {err}"))?;

    info!(schedule = schedule_expr, "import cron scheduled");

    let worker = WorkerBuilder::new("jobfeed-cron")
        .data(pipeline)
        .backend(CronStream::new(schedule))
        .build(run_scheduled_tick);

    worker.run().await;
    Ok(())
}
