//! Canonical domain types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized, not-yet-persisted job record extracted from one feed item.
///
/// Candidates ride inside queued work units, so the type is plain serde data
/// with no behavior attached. `(external_id, source_url)` is the identity
/// the store dedups on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCandidate {
    pub external_id: String,
    pub source_url: String,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    /// The captured feed item fields, kept verbatim for later inspection
    pub raw: serde_json::Value,
}

/// One record's failure inside a bulk upsert, as recorded in the import log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    /// External id of the record that failed, when known
    pub job_id: Option<String>,
    pub reason: String,
    /// Backend error code, when the store reported one
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_candidate_round_trips_through_json() {
        let candidate = JobCandidate {
            external_id: "guid-1".to_string(),
            source_url: "https://example.com/feed".to_string(),
            title: "Backend Engineer".to_string(),
            description: "Build services".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            link: "https://example.com/jobs/1".to_string(),
            published_at: None,
            raw: serde_json::json!({"title": "Backend Engineer"}),
        };

        let encoded = serde_json::to_string(&candidate).unwrap();
        let decoded: JobCandidate = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, candidate);
    }
}
