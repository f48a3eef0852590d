//! Laurel bot binary.
//!
//! Opens the settings and backup stores, connects to the Discord gateway,
//! and serves interactions until shut down.

use clap::Parser;
use laurel_bot::{BotContext, LaurelBot, LaurelConfig};
use laurel_store::{BackupStore, SettingsStore};
use std::sync::Arc;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::Cli;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Pick up DISCORD_TOKEN and LAUREL_DATA_DIR from .env when present
    dotenvy::dotenv().ok();

    let mut config = LaurelConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let settings = SettingsStore::new(config.settings_path())?;
    let backup = BackupStore::new(config.backup_path())?;
    let context = Arc::new(BotContext::new(settings, backup));

    let mut bot = LaurelBot::new(config.token, context).await?;
    bot.start().await?;

    Ok(())
}
