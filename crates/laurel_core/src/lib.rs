//! Core data types for the Laurel testimonial bot.
//!
//! This crate provides the domain types shared across the Laurel workspace:
//! per-guild configuration, review records for the backup ledger, and the
//! content sanitizer applied to every submission before it is stored or posted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod record;
mod sanitize;

pub use config::GuildConfig;
pub use record::{BackupStats, ReviewRecord};
pub use sanitize::{ContentSanitizer, SanitizedContent, MAX_CONTENT_LEN, MIN_CONTENT_LEN};
