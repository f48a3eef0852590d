//! JSON-file persistence for the Laurel testimonial bot.
//!
//! This crate provides the two durable stores behind the review system:
//!
//! - [`SettingsStore`]: per-guild configuration, mutated by admin commands.
//! - [`BackupStore`]: an append-only ledger of every submitted review,
//!   independent of the public-facing posted messages.
//!
//! Both stores keep a whole JSON object file on disk and perform every
//! mutation as a full read-modify-write of that file, guarded by a
//! process-scoped mutex per store. Writes go through a temp file and rename
//! so a crash never leaves a half-written store behind. Cross-process writers
//! are not coordinated; the last writer wins.
//!
//! Reads are deliberately forgiving: a missing or unparseable file is treated
//! as empty and logged, never surfaced to callers. Write failures surface for
//! settings (the admin who issued the command needs to know) while backup
//! write failures are left to the caller to log and swallow.
//!
//! # Example
//!
//! ```no_run
//! use laurel_store::SettingsStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SettingsStore::new("data/settings.json")?;
//! let config = store
//!     .update(1234, |config| config.reward_role = Some(42))
//!     .await?;
//! assert_eq!(config.reward_role, Some(42));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backup;
mod fs;
mod settings;

pub use backup::{BackupLedger, BackupStore};
pub use laurel_error::{StoreError, StoreErrorKind};
pub use settings::SettingsStore;
