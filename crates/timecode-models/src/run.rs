//! Run identifiers and summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one job run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a completed run, returned by the handler with status 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Ids collected by the lister
    pub catalog_size: usize,
    /// Records in the published dataset
    pub records: usize,
    /// Ids whose lookup failed or was skipped
    pub omitted: usize,
    /// False when the upload failed (the run still counts as completed)
    pub published: bool,
    pub object_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_summary_uses_camel_case() {
        let now = Utc::now();
        let summary = RunSummary {
            run_id: RunId("run-1".to_string()),
            started_at: now,
            finished_at: now,
            catalog_size: 3,
            records: 2,
            omitted: 1,
            published: true,
            object_key: "chapters.json".to_string(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["runId"], "run-1");
        assert_eq!(json["catalogSize"], 3);
        assert_eq!(json["objectKey"], "chapters.json");
    }
}
