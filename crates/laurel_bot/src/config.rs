//! Runtime configuration for the bot process.

use laurel_error::{ConfigError, LaurelResult};
use std::path::PathBuf;

/// Configuration read from the process environment.
#[derive(Debug, Clone)]
pub struct LaurelConfig {
    /// Discord bot token from the Discord Developer Portal
    pub token: String,
    /// Directory holding the settings and backup store files
    pub data_dir: PathBuf,
}

impl LaurelConfig {
    /// Load configuration from environment variables.
    ///
    /// `DISCORD_TOKEN` is required. `LAUREL_DATA_DIR` defaults to `data`
    /// relative to the working directory.
    ///
    /// # Errors
    /// Returns an error when `DISCORD_TOKEN` is unset.
    pub fn from_env() -> LaurelResult<Self> {
        let token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| ConfigError::new("DISCORD_TOKEN is not set"))?;

        let data_dir = std::env::var("LAUREL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        Ok(Self { token, data_dir })
    }

    /// Path of the settings store file.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    /// Path of the backup ledger file.
    pub fn backup_path(&self) -> PathBuf {
        self.data_dir.join("backup.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_paths() {
        let config = LaurelConfig {
            token: "t".to_string(),
            data_dir: PathBuf::from("/var/laurel"),
        };
        assert_eq!(config.settings_path(), PathBuf::from("/var/laurel/settings.json"));
        assert_eq!(config.backup_path(), PathBuf::from("/var/laurel/backup.json"));
    }
}
