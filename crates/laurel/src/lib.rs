//! Laurel - peer testimonial bot for Discord
//!
//! Laurel lets server members submit peer testimonials about staff through a
//! button-driven flow: a persistent entry-point button opens a reviewee
//! selection menu, a modal collects the review text, and the bot posts the
//! testimonial publicly, backs it up to an append-only ledger, and grants an
//! optional reward role to the reviewer.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use laurel::{BackupStore, BotContext, LaurelBot, LaurelConfig, SettingsStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LaurelConfig::from_env()?;
//!     let settings = SettingsStore::new(config.settings_path())?;
//!     let backup = BackupStore::new(config.backup_path())?;
//!
//!     let context = Arc::new(BotContext::new(settings, backup));
//!     let mut bot = LaurelBot::new(config.token, context).await?;
//!     bot.start().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Laurel is organized as a workspace with focused crates:
//!
//! - `laurel_error` - Error types
//! - `laurel_core` - Core data types (GuildConfig, ReviewRecord, sanitizer)
//! - `laurel_store` - Settings store and backup ledger persistence
//! - `laurel_bot` - Discord integration: pipeline, commands, client
//!
//! This crate (`laurel`) re-exports everything for convenience.

pub use laurel_bot::*;
pub use laurel_core::*;
pub use laurel_error::*;
pub use laurel_store::*;
