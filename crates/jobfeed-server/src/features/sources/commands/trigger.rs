//! Trigger import command
//!
//! The manual counterpart of the cron tick: fetch one source now and queue
//! its candidates. Responds once the units are submitted; consumption is
//! asynchronous.

use jobfeed_common::ImportError;
use mediator::Request;
use serde::Serialize;
use uuid::Uuid;

use crate::db::repository::SourceRepository;
use crate::ingest::ImportPipeline;

/// Command to trigger one source's import
#[derive(Debug, Clone)]
pub struct TriggerImportCommand {
    pub source_id: Uuid,
}

/// Response once the fetch has been queued
#[derive(Debug, Serialize)]
pub struct TriggerImportResponse {
    pub message: String,
    pub total_jobs: usize,
    pub chunk_count: usize,
}

/// Error type for the trigger command
#[derive(Debug, thiserror::Error)]
pub enum TriggerImportError {
    #[error("source {0} not found")]
    SourceNotFound(Uuid),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl Request<Result<TriggerImportResponse, TriggerImportError>> for TriggerImportCommand {}

pub async fn handle(
    sources: &dyn SourceRepository,
    pipeline: &ImportPipeline,
    command: TriggerImportCommand,
) -> Result<TriggerImportResponse, TriggerImportError> {
    let source = sources
        .find_by_id(command.source_id)
        .await?
        .ok_or(TriggerImportError::SourceNotFound(command.source_id))?;

    let receipt = pipeline.import_source(&source).await?;

    let message = if receipt.total_jobs == 0 {
        "no jobs fetched"
    } else {
        "import queued"
    };

    Ok(TriggerImportResponse {
        message: message.to_string(),
        total_jobs: receipt.total_jobs,
        chunk_count: receipt.chunk_count,
    })
}
