//! Shared bot state threaded through event handlers.

use derive_getters::Getters;
use laurel_core::ContentSanitizer;
use laurel_store::{BackupStore, SettingsStore};
use std::sync::OnceLock;

/// Context constructed once at startup and shared by every handler.
///
/// Holds the two store handles and the content sanitizer; there is no global
/// bot singleton. The bot's own user ID is learned from the `ready` event and
/// recorded here for permission checks.
#[derive(Getters)]
pub struct BotContext {
    /// Per-guild configuration store
    settings: SettingsStore,
    /// Append-only review ledger
    backup: BackupStore,
    /// Sanitizer applied to every submission
    sanitizer: ContentSanitizer,
    #[getter(skip)]
    bot_user_id: OnceLock<u64>,
}

impl BotContext {
    /// Create the context from opened stores.
    pub fn new(settings: SettingsStore, backup: BackupStore) -> Self {
        Self {
            settings,
            backup,
            sanitizer: ContentSanitizer::new(),
            bot_user_id: OnceLock::new(),
        }
    }

    /// Record the bot's own user ID once connected.
    ///
    /// Later calls are ignored; reconnects report the same identity.
    pub fn set_bot_user(&self, user_id: u64) {
        let _ = self.bot_user_id.set(user_id);
    }

    /// The bot's own user ID, available after the first `ready` event.
    pub fn bot_user(&self) -> Option<u64> {
        self.bot_user_id.get().copied()
    }
}
