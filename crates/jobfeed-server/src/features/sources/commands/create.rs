//! Create source command

use mediator::Request;
use serde::Deserialize;

use crate::db::repository::{JobSource, SourceRepository};

/// Command to register a new feed source
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSourceCommand {
    pub url: String,
    #[serde(default)]
    pub name: String,
}

/// Error type for source creation
#[derive(Debug, thiserror::Error)]
pub enum CreateSourceError {
    #[error("url is required")]
    MissingUrl,

    #[error("a source with this url already exists")]
    Duplicate,

    #[error(transparent)]
    Repository(anyhow::Error),
}

impl Request<Result<JobSource, CreateSourceError>> for CreateSourceCommand {}

pub async fn handle(
    repo: &dyn SourceRepository,
    command: CreateSourceCommand,
) -> Result<JobSource, CreateSourceError> {
    let url = command.url.trim();
    if url.is_empty() {
        return Err(CreateSourceError::MissingUrl);
    }

    repo.create(url, &command.name).await.map_err(|err| {
        if is_unique_violation(&err) {
            CreateSourceError::Duplicate
        } else {
            CreateSourceError::Repository(err)
        }
    })
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == "23505")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemorySourceRepository;

    #[tokio::test]
    async fn blank_url_is_rejected() {
        let repo = MemorySourceRepository::default();
        let command = CreateSourceCommand {
            url: "   ".to_string(),
            name: String::new(),
        };
        assert!(matches!(
            handle(&repo, command).await,
            Err(CreateSourceError::MissingUrl)
        ));
    }

    #[tokio::test]
    async fn url_is_trimmed_on_create() {
        let repo = MemorySourceRepository::default();
        let command = CreateSourceCommand {
            url: "  https://boards.example/jobs.rss  ".to_string(),
            name: "Example".to_string(),
        };
        let source = handle(&repo, command).await.unwrap();
        assert_eq!(source.url, "https://boards.example/jobs.rss");
        assert_eq!(source.name, "Example");
    }
}
