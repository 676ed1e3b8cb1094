//! Queue payload and result types for feed imports.

use jobfeed_common::{FailureReason, JobCandidate};
use serde::{Deserialize, Serialize};

/// One bounded slice of a fetch's candidate list, queued as a single item
/// of work.
///
/// All chunks of one fetch share a `run_id`; `chunk_index`/`total_chunks`
/// correlate partial results. Single-unit runs omit chunk metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportWorkUnit {
    pub source_url: String,
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<u32>,
    pub jobs: Vec<JobCandidate>,
}

impl ImportWorkUnit {
    /// Number of candidates this unit carries.
    pub fn total_fetched(&self) -> usize {
        self.jobs.len()
    }
}

/// Aggregated outcome of upserting one unit.
///
/// Counts always cover every evaluated record; only the reason *list* is
/// capped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpsertStats {
    pub new_jobs: u64,
    pub updated_jobs: u64,
    pub failed_jobs: u64,
    pub failure_reasons: Vec<FailureReason>,
}

impl UpsertStats {
    /// Successfully written records. Failed records are excluded.
    pub fn total_imported(&self) -> u64 {
        self.new_jobs + self.updated_jobs
    }

    /// Records evaluated in total, successes and failures alike.
    pub fn total_evaluated(&self) -> u64 {
        self.new_jobs + self.updated_jobs + self.failed_jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_unit_runs_omit_chunk_metadata_in_payload() {
        let unit = ImportWorkUnit {
            source_url: "https://feed.example".to_string(),
            run_id: "https://feed.example|1722800000000".to_string(),
            chunk_index: None,
            total_chunks: None,
            jobs: vec![],
        };
        let encoded = serde_json::to_value(&unit).unwrap();
        assert!(encoded.get("chunk_index").is_none());
        assert!(encoded.get("total_chunks").is_none());
    }

    #[test]
    fn total_imported_excludes_failures() {
        let stats = UpsertStats {
            new_jobs: 3,
            updated_jobs: 2,
            failed_jobs: 4,
            failure_reasons: vec![],
        };
        assert_eq!(stats.total_imported(), 5);
        assert_eq!(stats.total_evaluated(), 9);
    }
}
