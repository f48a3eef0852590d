//! Discord integration for the Laurel testimonial bot.
//!
//! This crate connects the Laurel stores to Discord: it owns the gateway
//! client, the interaction handler, the review submission pipeline, and the
//! administrative command surface.
//!
//! # Submission flow
//!
//! A persistent entry-point button opens an ephemeral selection menu built
//! from the guild's reviewee pool; picking a member opens a modal; submitting
//! the modal sanitizes and validates the text, appends a record to the backup
//! ledger, posts the public testimonial embed, and attempts the reward-role
//! grant, in that order.
//!
//! # Structure
//!
//! - Error types in `error`, with per-kind user messages and categories
//! - Shared state in `context`, threaded through every handler
//! - Pure pool construction in `pool`, UI builders in `ui`
//! - The three pipeline stages in `pipeline`
//! - Slash commands in `commands`, startup reattachment in `reattach`
//! - Client lifecycle in `client`, gateway events in `handler`

#![warn(missing_docs)]

mod client;
mod commands;
mod config;
mod context;
mod error;
mod handler;
mod pipeline;
mod pool;
mod reattach;
mod ui;

pub use client::LaurelBot;
pub use commands::command_definitions;
pub use config::LaurelConfig;
pub use context::BotContext;
pub use error::{BotError, BotErrorKind, BotResult, ErrorCategory};
pub use handler::LaurelHandler;
pub use pool::{MAX_POOL_SIZE, MemberProfile, PoolEntry, build_pool, is_elevated};
