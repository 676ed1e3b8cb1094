//! Import log routes
//!
//! Read-only. The audit trail is append-only; there is nothing to write
//! through HTTP.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use super::queries::{list::handle as handle_list, ListImportLogsQuery};
use crate::error::AppError;
use crate::features::FeatureState;

/// Create import log routes
pub fn import_logs_routes() -> Router<FeatureState> {
    Router::new().route("/import-logs", get(list_import_logs))
}

/// List import logs
///
/// GET /import-logs?page=1&limit=20&source_url=https://...
async fn list_import_logs(
    State(state): State<FeatureState>,
    Query(query): Query<ListImportLogsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let response = handle_list(state.import_logs.as_ref(), query).await?;
    Ok(Json(response))
}

impl From<super::queries::ListImportLogsError> for AppError {
    fn from(err: super::queries::ListImportLogsError) -> Self {
        match err {
            super::queries::ListImportLogsError::Repository(inner) => AppError::Internal(inner),
        }
    }
}
