//! List import logs query
//!
//! Reverse-chronological audit entries, optionally filtered by source,
//! with offset pagination.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::db::repository::{ImportLog, ImportLogRepository};
use crate::features::shared::pagination::{PaginationMeta, PaginationParams};

/// Query to list import log entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListImportLogsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Restrict to one source's entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Response for the list query
#[derive(Debug, Serialize)]
pub struct ListImportLogsResponse {
    pub logs: Vec<ImportLog>,
    pub pagination: PaginationMeta,
}

/// Error type for the list query
#[derive(Debug, thiserror::Error)]
pub enum ListImportLogsError {
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl Request<Result<ListImportLogsResponse, ListImportLogsError>> for ListImportLogsQuery {}

pub async fn handle(
    repo: &dyn ImportLogRepository,
    query: ListImportLogsQuery,
) -> Result<ListImportLogsResponse, ListImportLogsError> {
    let params = PaginationParams::new(query.page, query.limit);
    let source = query.source_url.as_deref();

    let logs = repo
        .find_filtered(source, params.limit(), params.offset())
        .await?;
    let total = repo.count_filtered(source).await?;

    Ok(ListImportLogsResponse {
        logs,
        pagination: PaginationMeta::from_params(&params, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryImportLogRepository;
    use crate::db::repository::{ImportLogRepository as _, NewImportLog};

    fn entry(source_url: &str, run_id: &str) -> NewImportLog {
        NewImportLog {
            source_url: source_url.to_string(),
            run_id: run_id.to_string(),
            chunk_index: None,
            total_chunks: None,
            total_fetched: 5,
            total_imported: 5,
            new_jobs: 5,
            updated_jobs: 0,
            failed_jobs: 0,
            failure_reasons: vec![],
        }
    }

    #[tokio::test]
    async fn lists_newest_first_with_pagination_meta() {
        let repo = MemoryImportLogRepository::new();
        repo.insert(entry("https://a", "run-1")).await.unwrap();
        repo.insert(entry("https://a", "run-2")).await.unwrap();
        repo.insert(entry("https://b", "run-3")).await.unwrap();

        let response = handle(&repo, ListImportLogsQuery::default()).await.unwrap();

        assert_eq!(response.logs.len(), 3);
        assert_eq!(response.logs[0].run_id, "run-3");
        assert_eq!(response.pagination.total, 3);
        assert_eq!(response.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn filters_by_source_url() {
        let repo = MemoryImportLogRepository::new();
        repo.insert(entry("https://a", "run-1")).await.unwrap();
        repo.insert(entry("https://b", "run-2")).await.unwrap();

        let query = ListImportLogsQuery {
            source_url: Some("https://a".to_string()),
            ..Default::default()
        };
        let response = handle(&repo, query).await.unwrap();

        assert_eq!(response.logs.len(), 1);
        assert_eq!(response.logs[0].source_url, "https://a");
        assert_eq!(response.pagination.total, 1);
    }

    #[tokio::test]
    async fn paginates_with_offset() {
        let repo = MemoryImportLogRepository::new();
        for n in 0..5 {
            repo.insert(entry("https://a", &format!("run-{n}")))
                .await
                .unwrap();
        }

        let query = ListImportLogsQuery {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        };
        let response = handle(&repo, query).await.unwrap();

        assert_eq!(response.logs.len(), 2);
        // newest first: page 2 holds run-2 and run-1
        assert_eq!(response.logs[0].run_id, "run-2");
        assert_eq!(response.pagination.total, 5);
        assert_eq!(response.pagination.total_pages, 3);
    }
}
