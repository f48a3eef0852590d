//! Per-guild configuration store.

use crate::fs;
use laurel_core::GuildConfig;
use laurel_error::LaurelResult;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Durable store of per-guild configuration.
///
/// The whole settings file is read and rewritten on every mutation; mutations
/// are serialized by a process-scoped mutex. Reads never fail: a missing or
/// corrupt file loads as an empty mapping.
pub struct SettingsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SettingsStore {
    /// Open a settings store at the given path.
    ///
    /// Creates the parent directory and initializes the file to `{}` when
    /// absent.
    ///
    /// # Errors
    /// Returns an error if the directory or initial file cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> LaurelResult<Self> {
        let path = fs::prepare(path)?;
        tracing::info!(path = %path.display(), "Opened settings store");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Load every guild's configuration.
    ///
    /// A missing or unparseable file loads as an empty mapping; this method
    /// never fails.
    pub async fn load(&self) -> HashMap<u64, GuildConfig> {
        fs::read_or_default(&self.path).await
    }

    /// Replace the whole settings file.
    ///
    /// # Errors
    /// Returns an error if serialization or the file write fails. Unlike
    /// reads, settings write failures are user-visible and actionable, so
    /// they always surface to the caller.
    #[instrument(skip(self, configs), fields(guilds = configs.len()))]
    pub async fn save(&self, configs: &HashMap<u64, GuildConfig>) -> LaurelResult<()> {
        let _guard = self.lock.lock().await;
        fs::write_atomic(&self.path, configs).await
    }

    /// Get one guild's configuration, if present.
    pub async fn get(&self, guild_id: u64) -> Option<GuildConfig> {
        let mut configs = self.load().await;
        configs.remove(&guild_id)
    }

    /// Read-modify-write one guild's configuration.
    ///
    /// Creates a default config for the guild when none exists, applies `f`,
    /// and persists the result. The mutex is held across the whole cycle so
    /// concurrent updates within the process cannot interleave.
    ///
    /// # Errors
    /// Returns an error if the rewritten file cannot be persisted.
    #[instrument(skip(self, f))]
    pub async fn update<F>(&self, guild_id: u64, f: F) -> LaurelResult<GuildConfig>
    where
        F: FnOnce(&mut GuildConfig),
    {
        let _guard = self.lock.lock().await;
        let mut configs: HashMap<u64, GuildConfig> = fs::read_or_default(&self.path).await;

        let config = configs.entry(guild_id).or_default();
        f(config);
        let updated = config.clone();

        fs::write_atomic(&self.path, &configs).await?;
        debug!(guild_id, "Updated guild configuration");
        Ok(updated)
    }

    /// Erase one guild's configuration wholesale.
    ///
    /// Returns `true` when a config existed and was removed.
    ///
    /// # Errors
    /// Returns an error if the rewritten file cannot be persisted.
    #[instrument(skip(self))]
    pub async fn clear(&self, guild_id: u64) -> LaurelResult<bool> {
        let _guard = self.lock.lock().await;
        let mut configs: HashMap<u64, GuildConfig> = fs::read_or_default(&self.path).await;

        let removed = configs.remove(&guild_id).is_some();
        if removed {
            fs::write_atomic(&self.path, &configs).await?;
            debug!(guild_id, "Cleared guild configuration");
        }

        Ok(removed)
    }
}
