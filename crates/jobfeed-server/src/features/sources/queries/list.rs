//! List sources query

use crate::db::repository::{JobSource, SourceRepository};

/// Error type for the list query
#[derive(Debug, thiserror::Error)]
pub enum ListSourcesError {
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

/// All registered sources, newest first.
pub async fn handle(repo: &dyn SourceRepository) -> Result<Vec<JobSource>, ListSourcesError> {
    Ok(repo.list().await?)
}
