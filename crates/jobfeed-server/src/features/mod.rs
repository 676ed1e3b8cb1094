//! HTTP feature modules.
//!
//! Commands (writes) and queries (reads) are split per feature, with thin
//! axum routes on top. Handlers receive repositories and the import
//! pipeline through [`FeatureState`]; nothing here talks to a concrete
//! store driver.

pub mod import_logs;
pub mod shared;
pub mod sources;

use std::sync::Arc;

use axum::Router;

use crate::db::repository::{ImportLogRepository, SourceRepository};
use crate::ingest::ImportPipeline;

/// Shared state for feature routers
#[derive(Clone)]
pub struct FeatureState {
    pub sources: Arc<dyn SourceRepository>,
    pub import_logs: Arc<dyn ImportLogRepository>,
    pub pipeline: Arc<ImportPipeline>,
}

/// Assemble all feature routes under one router
pub fn router(state: FeatureState) -> Router {
    Router::new()
        .merge(sources::routes::sources_routes())
        .merge(import_logs::routes::import_logs_routes())
        .with_state(state)
}
