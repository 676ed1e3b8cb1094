//! Jobfeed Server - Main entry point
//!
//! The producer process: HTTP API plus the periodic import trigger.
//! Consumption happens in `jobfeed-worker` processes.

use std::sync::Arc;

use anyhow::Result;
use jobfeed_common::logging::{init_logging, LogConfig};
use jobfeed_ingest::FeedFetcher;
use tracing::info;

use jobfeed_server::{
    api,
    config::Config,
    db::{self, PgImportLogRepository, PgSourceRepository},
    features::FeatureState,
    ingest::{scheduler, ImportPipeline, ImportQueue},
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::for_binary(
        "jobfeed-server",
        "jobfeed_server=info,jobfeed_ingest=info,tower_http=info,sqlx=warn",
    )?;
    init_logging(&log_config)?;

    info!("starting jobfeed server");

    let config = Config::load()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        "configuration loaded"
    );

    let db_config = db::DbConfig::from_env()?;
    let pool = db::create_pool(&db_config).await?;
    info!("database connection pool established");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    ImportQueue::setup(&pool).await?;
    info!("database migrations completed");

    let sources = Arc::new(PgSourceRepository::new(pool.clone()));
    let import_logs = Arc::new(PgImportLogRepository::new(pool.clone()));

    let fetcher = FeedFetcher::new(&config.fetch)?;
    let queue = ImportQueue::new(pool.clone(), config.queue.clone());
    let pipeline = Arc::new(ImportPipeline::new(fetcher, queue, sources.clone()));

    if config.cron.enabled {
        let schedule = config.cron.schedule.clone();
        let cron_pipeline = pipeline.clone();
        tokio::spawn(async move {
            if let Err(err) = scheduler::run_import_cron(&schedule, cron_pipeline).await {
                tracing::error!(error = %err, "import cron stopped");
            }
        });
    } else {
        info!("import cron is disabled (CRON_ENABLED=false)");
    }

    let state = FeatureState {
        sources,
        import_logs,
        pipeline,
    };

    api::serve(&config, state).await
}
