//! Jobfeed Worker - queue consumer process
//!
//! Pulls import work units and applies them to the store. Safe to run as
//! several processes side by side; the queue backend hands each unit to
//! exactly one live consumer at a time and owns redelivery.

use std::sync::Arc;

use anyhow::Result;
use jobfeed_common::logging::{init_logging, LogConfig};
use tracing::info;

use jobfeed_server::{
    config::Config,
    db::{self, PgImportLogRepository, PgJobRepository},
    ingest::{scheduler::ImportWorkerPool, ConsumerContext, ImportQueue, UpsertEngine},
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::for_binary("jobfeed-worker", "jobfeed_server=info,sqlx=warn")?;
    init_logging(&log_config)?;

    info!("starting jobfeed worker");

    let config = Config::load()?;
    let db_config = db::DbConfig::from_env()?;
    let pool = db::create_pool(&db_config).await?;
    info!("database connection pool established");

    ImportQueue::setup(&pool).await?;

    let jobs = Arc::new(PgJobRepository::new(pool.clone()));
    let logs = Arc::new(PgImportLogRepository::new(pool.clone()));

    let engine = UpsertEngine::new(
        jobs,
        config.queue.batch_size,
        config.queue.max_failure_reasons,
    );
    let context = Arc::new(ConsumerContext::new(engine, logs));

    let queue = ImportQueue::new(pool, config.queue.clone());
    let pool_size = config.queue.concurrency;
    let max_attempts = config.queue.max_attempts;

    ImportWorkerPool::new(queue, context, pool_size, max_attempts)
        .run()
        .await
}
