//! Review records for the backup ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One submitted review, stored under its guild ID in the backup ledger.
///
/// Once written, a record is immutable: the ledger never deletes or edits
/// entries, even when the public message referencing it is later removed by
/// moderators. Field names serialize in the on-disk backup format, where the
/// interaction timestamp is stored as `timestamp` and the write time as
/// `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    /// Member who submitted the review
    pub reviewer_id: u64,
    /// Member the review is about
    pub reviewed_id: u64,
    /// Sanitized review text, length-capped
    pub content: String,
    /// When the originating interaction was created
    #[serde(rename = "timestamp")]
    pub submitted_at: DateTime<Utc>,
    /// Wall-clock time of the backup write
    #[serde(rename = "createdAt")]
    pub recorded_at: DateTime<Utc>,
}

impl ReviewRecord {
    /// Create a record for a fresh submission.
    ///
    /// `recorded_at` is stamped again by the backup store at write time, so
    /// the value set here only matters for records that never reach the store.
    pub fn new(
        reviewer_id: u64,
        reviewed_id: u64,
        content: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reviewer_id,
            reviewed_id,
            content: content.into(),
            submitted_at,
            recorded_at: Utc::now(),
        }
    }
}

/// Summary counts over one guild's backup ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupStats {
    /// Total records submitted for the guild
    pub total_records: usize,
    /// Distinct members who submitted at least one review
    pub unique_reviewers: usize,
    /// Distinct members reviewed at least once
    pub unique_reviewed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_names() {
        let record = ReviewRecord::new(10, 20, "a thoughtful review", Utc::now());
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"reviewerId\":10"));
        assert!(json.contains("\"reviewedId\":20"));
        assert!(json.contains("\"content\""));
        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("submittedAt"));
        assert!(!json.contains("recordedAt"));
    }

    #[test]
    fn test_record_round_trip() {
        let record = ReviewRecord::new(10, 20, "a thoughtful review", Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        let back: ReviewRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
