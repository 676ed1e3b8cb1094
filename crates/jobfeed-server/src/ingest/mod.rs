//! Feed import pipeline.
//!
//! - **jobs**: queue payload (`ImportWorkUnit`) and result stats
//! - **queue**: chunking and submission to the apalis backend
//! - **pipeline**: producer side, fetch one source and enqueue its chunks
//! - **upsert**: idempotent bulk persistence with per-record isolation
//! - **worker**: consumer side, one unit in, one import log entry out
//! - **scheduler**: worker pool and cron trigger wiring

pub mod jobs;
pub mod pipeline;
pub mod queue;
pub mod scheduler;
pub mod upsert;
pub mod worker;

pub use jobs::{ImportWorkUnit, UpsertStats};
pub use pipeline::ImportPipeline;
pub use queue::{chunk_candidates, EnqueueReceipt, ImportQueue};
pub use upsert::UpsertEngine;
pub use worker::ConsumerContext;
