//! Producer side: fetch one source, normalize, enqueue.

use std::sync::Arc;

use jobfeed_ingest::FeedFetcher;
use tracing::{error, info, warn};

use super::queue::{EnqueueReceipt, ImportQueue};
use crate::db::repository::{JobSource, SourceRepository};

/// Fetch-normalize-enqueue for feed sources.
///
/// Owns its collaborators by explicit construction; the HTTP trigger and
/// the cron tick both run through here.
pub struct ImportPipeline {
    fetcher: FeedFetcher,
    queue: ImportQueue,
    sources: Arc<dyn SourceRepository>,
}

impl ImportPipeline {
    pub fn new(fetcher: FeedFetcher, queue: ImportQueue, sources: Arc<dyn SourceRepository>) -> Self {
        Self {
            fetcher,
            queue,
            sources,
        }
    }

    /// Import one source: fetch its feed, normalize, submit work units.
    ///
    /// Feed and queue failures propagate with their classification intact;
    /// failing to stamp `last_fetched_at` only warns, the import already
    /// succeeded.
    pub async fn import_source(
        &self,
        source: &JobSource,
    ) -> jobfeed_common::Result<EnqueueReceipt> {
        let candidates = self.fetcher.fetch_jobs(&source.url).await?;
        let receipt = self.queue.enqueue(&source.url, candidates).await?;

        if let Err(err) = self.sources.mark_fetched(source.id).await {
            warn!(source_url = %source.url, error = %err, "failed to stamp fetch time");
        }

        Ok(receipt)
    }

    /// One scheduled tick over all enabled sources.
    ///
    /// Each source is imported independently: a bad feed is logged and the
    /// walk continues. A dead queue ends the tick early; every remaining
    /// source would fail the same way.
    pub async fn run_tick(&self) {
        let sources = match self.sources.list_enabled().await {
            Ok(sources) => sources,
            Err(err) => {
                error!(error = %err, "tick aborted, could not list sources");
                return;
            }
        };

        info!(sources = sources.len(), "import tick started");
        let mut queued = 0usize;
        let mut failed = 0usize;

        for source in &sources {
            match self.import_source(source).await {
                Ok(receipt) if receipt.chunk_count == 0 => {
                    info!(source_url = %source.url, "source had no candidates to queue");
                }
                Ok(receipt) => {
                    queued += 1;
                    info!(
                        source_url = %source.url,
                        total_jobs = receipt.total_jobs,
                        chunks = receipt.chunk_count,
                        "source queued"
                    );
                }
                Err(err) if err.is_queue_error() => {
                    warn!(
                        source_url = %source.url,
                        error = %err,
                        "queue unavailable, skipping the rest of this tick"
                    );
                    return;
                }
                Err(err) => {
                    failed += 1;
                    error!(
                        source_url = %source.url,
                        code = err.classification(),
                        error = %err,
                        "source import failed"
                    );
                }
            }
        }

        info!(queued, failed, "import tick finished");
    }
}
