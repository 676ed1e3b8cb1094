//! Configuration management

use jobfeed_ingest::FetchConfig;
use serde::{Deserialize, Serialize};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 4000;

/// Default candidates per queued work unit.
pub const DEFAULT_CHUNK_SIZE: usize = 25_000;

/// Default records per bulk store operation.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default cap on stored failure reasons per import log entry.
pub const DEFAULT_MAX_FAILURE_REASONS: usize = 500;

/// Default in-process consumer concurrency.
pub const DEFAULT_WORKER_CONCURRENCY: usize = 5;

/// Default delivery attempts per unit (owned by the queue backend).
pub const DEFAULT_UNIT_ATTEMPTS: usize = 3;

/// Default grace period before finished queue bookkeeping may be pruned.
pub const DEFAULT_PRUNE_GRACE_SECS: i64 = 60;

/// Default number of finished queue rows pruned per submission.
pub const DEFAULT_PRUNE_LIMIT: i64 = 500;

/// Default import schedule: hourly, on the hour.
pub const DEFAULT_CRON_SCHEDULE: &str = "0 0 * * * *";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub queue: QueueConfig,
    pub cron: CronConfig,
    #[serde(skip)]
    pub fetch: FetchConfig,
}

/// HTTP server binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Queue and import sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Candidates per queued work unit
    pub chunk_size: usize,
    /// Records per bulk store operation inside one unit
    pub batch_size: usize,
    /// Cap on failure reasons kept per unit; counts are never capped
    pub max_failure_reasons: usize,
    /// Consumer worker slots per process
    pub concurrency: usize,
    /// Delivery attempts per unit, applied by the queue backend
    pub max_attempts: usize,
    /// Age before finished bookkeeping rows become prunable
    pub prune_grace_secs: i64,
    /// Finished bookkeeping rows pruned per submission
    pub prune_limit: i64,
}

/// Periodic import trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first)
    pub schedule: String,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("JOBFEED_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_parsed("JOBFEED_PORT", DEFAULT_SERVER_PORT),
            },
            queue: QueueConfig {
                chunk_size: env_parsed("QUEUE_JOBS_PER_UNIT", DEFAULT_CHUNK_SIZE),
                batch_size: env_parsed("IMPORT_BATCH_SIZE", DEFAULT_BATCH_SIZE),
                max_failure_reasons: env_parsed(
                    "IMPORT_MAX_FAILURE_REASONS",
                    DEFAULT_MAX_FAILURE_REASONS,
                ),
                concurrency: env_parsed("WORKER_CONCURRENCY", DEFAULT_WORKER_CONCURRENCY),
                max_attempts: env_parsed("UNIT_ATTEMPTS", DEFAULT_UNIT_ATTEMPTS),
                prune_grace_secs: env_parsed("QUEUE_PRUNE_GRACE_SECS", DEFAULT_PRUNE_GRACE_SECS),
                prune_limit: env_parsed("QUEUE_PRUNE_LIMIT", DEFAULT_PRUNE_LIMIT),
            },
            cron: CronConfig {
                enabled: env_parsed("CRON_ENABLED", true),
                schedule: std::env::var("CRON_SCHEDULE")
                    .unwrap_or_else(|_| DEFAULT_CRON_SCHEDULE.to_string()),
            },
            fetch: FetchConfig {
                timeout_secs: env_parsed("FETCH_TIMEOUT_SECS", 30),
                max_redirects: env_parsed("FETCH_MAX_REDIRECTS", 5),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.queue.chunk_size == 0 {
            anyhow::bail!("QUEUE_JOBS_PER_UNIT must be greater than zero");
        }
        if self.queue.batch_size == 0 {
            anyhow::bail!("IMPORT_BATCH_SIZE must be greater than zero");
        }
        if self.queue.concurrency == 0 {
            anyhow::bail!("WORKER_CONCURRENCY must be greater than zero");
        }
        Ok(())
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
