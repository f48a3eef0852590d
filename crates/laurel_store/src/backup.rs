//! Append-only backup ledger of submitted reviews.

use crate::fs;
use chrono::Utc;
use laurel_core::{BackupStats, ReviewRecord};
use laurel_error::LaurelResult;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

/// Every guild's records, keyed by guild ID and then record ID.
pub type BackupLedger = HashMap<u64, HashMap<Uuid, ReviewRecord>>;

/// Durable, append-only ledger of every submitted review.
///
/// Records are keyed by a freshly generated v4 UUID, so collision probability
/// is cryptographically negligible. The ledger never deletes or edits
/// entries. A backup write failure must not abort a submission: callers log
/// the error and proceed without a record ID.
pub struct BackupStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl BackupStore {
    /// Open a backup store at the given path.
    ///
    /// Creates the parent directory and initializes the file to `{}` when
    /// absent.
    ///
    /// # Errors
    /// Returns an error if the directory or initial file cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> LaurelResult<Self> {
        let path = fs::prepare(path)?;
        tracing::info!(path = %path.display(), "Opened backup store");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Append a record to the guild's ledger, returning its generated ID.
    ///
    /// Stamps `recorded_at` with the write time. The mutex is held across the
    /// read-modify-write cycle.
    ///
    /// # Errors
    /// Returns an error if the rewritten file cannot be persisted. Submission
    /// handling treats this as non-fatal; posting proceeds without a record
    /// reference.
    #[instrument(skip(self, record), fields(reviewer_id = record.reviewer_id, reviewed_id = record.reviewed_id))]
    pub async fn append(&self, guild_id: u64, mut record: ReviewRecord) -> LaurelResult<Uuid> {
        let _guard = self.lock.lock().await;
        let mut ledger: BackupLedger = fs::read_or_default(&self.path).await;

        let record_id = Uuid::new_v4();
        record.recorded_at = Utc::now();
        ledger.entry(guild_id).or_default().insert(record_id, record);

        fs::write_atomic(&self.path, &ledger).await?;
        info!(guild_id, record_id = %record_id, "Appended review record");
        Ok(record_id)
    }

    /// Load the entire ledger.
    ///
    /// A missing or unparseable file loads as an empty mapping; this method
    /// never fails.
    pub async fn load_all(&self) -> BackupLedger {
        fs::read_or_default(&self.path).await
    }

    /// Summarize one guild's ledger.
    pub async fn stats(&self, guild_id: u64) -> BackupStats {
        let ledger = self.load_all().await;
        let Some(records) = ledger.get(&guild_id) else {
            return BackupStats::default();
        };

        let reviewers: HashSet<u64> = records.values().map(|r| r.reviewer_id).collect();
        let reviewed: HashSet<u64> = records.values().map(|r| r.reviewed_id).collect();

        BackupStats {
            total_records: records.len(),
            unique_reviewers: reviewers.len(),
            unique_reviewed: reviewed.len(),
        }
    }
}
