//! Source routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::commands::{
    create::handle as handle_create, trigger::handle as handle_trigger, CreateSourceCommand,
    CreateSourceError, TriggerImportCommand, TriggerImportError,
};
use super::queries::{list::handle as handle_list, ListSourcesError};
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::features::FeatureState;

/// Create source routes
pub fn sources_routes() -> Router<FeatureState> {
    Router::new()
        .route("/sources", get(list_sources).post(create_source))
        .route("/sources/:id/trigger", post(trigger_import))
}

/// List all sources
///
/// GET /sources
async fn list_sources(State(state): State<FeatureState>) -> Result<impl IntoResponse, AppError> {
    let sources = handle_list(state.sources.as_ref()).await?;
    Ok(ApiResponse::success(sources))
}

/// Register a new source
///
/// POST /sources {"url": "...", "name": "..."}
async fn create_source(
    State(state): State<FeatureState>,
    Json(command): Json<CreateSourceCommand>,
) -> Result<impl IntoResponse, AppError> {
    let source = handle_create(state.sources.as_ref(), command).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(source)))
}

/// Fetch and queue one source now
///
/// POST /sources/:id/trigger
async fn trigger_import(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let response = handle_trigger(
        state.sources.as_ref(),
        &state.pipeline,
        TriggerImportCommand { source_id: id },
    )
    .await?;
    Ok(ApiResponse::success(response))
}

impl From<ListSourcesError> for AppError {
    fn from(err: ListSourcesError) -> Self {
        match err {
            ListSourcesError::Repository(inner) => AppError::Internal(inner),
        }
    }
}

impl From<CreateSourceError> for AppError {
    fn from(err: CreateSourceError) -> Self {
        match err {
            CreateSourceError::MissingUrl => AppError::Validation(err.to_string()),
            CreateSourceError::Duplicate => AppError::Conflict(err.to_string()),
            CreateSourceError::Repository(inner) => AppError::Internal(inner),
        }
    }
}

impl From<TriggerImportError> for AppError {
    fn from(err: TriggerImportError) -> Self {
        match err {
            TriggerImportError::SourceNotFound(_) => AppError::NotFound(err.to_string()),
            TriggerImportError::Import(inner) => AppError::Import(inner),
            TriggerImportError::Repository(inner) => AppError::Internal(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_build() {
        let _router = sources_routes();
    }
}
