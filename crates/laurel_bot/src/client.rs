//! Discord bot client setup and lifecycle management.
//!
//! This module provides the LaurelBot struct which manages the Discord client
//! connection, event handling, and store integration.

use crate::context::BotContext;
use crate::error::{BotError, BotErrorKind};
use crate::handler::LaurelHandler;
use serenity::Client;
use std::sync::Arc;
use tracing::{info, instrument};

/// Main Discord bot client for Laurel.
///
/// Manages the Serenity client connection and shares the settings store,
/// backup ledger, and sanitizer with every event handler via [`BotContext`].
///
/// # Example
/// ```no_run
/// use laurel_bot::{BotContext, LaurelBot};
/// use laurel_store::{BackupStore, SettingsStore};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let settings = SettingsStore::new("data/settings.json")?;
///     let backup = BackupStore::new("data/backup.json")?;
///
///     let context = Arc::new(BotContext::new(settings, backup));
///     let mut bot = LaurelBot::new(token, context).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct LaurelBot {
    /// Serenity client instance
    client: Client,
}

impl LaurelBot {
    /// Create a new LaurelBot instance.
    ///
    /// # Arguments
    /// * `token` - Discord bot token from the Discord Developer Portal
    /// * `context` - Shared stores and sanitizer
    ///
    /// # Errors
    /// Returns an error if:
    /// - The bot token is invalid
    /// - The Serenity client fails to initialize
    #[instrument(skip(token, context), fields(token_len = token.len()))]
    pub async fn new(token: String, context: Arc<BotContext>) -> Result<Self, BotError> {
        info!("Initializing Laurel Discord bot");

        let handler = LaurelHandler::new(context);
        let intents = LaurelHandler::intents();

        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(&token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                BotError::new(BotErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        info!("Serenity client built successfully");

        Ok(Self { client })
    }

    /// Start the Discord bot.
    ///
    /// This method blocks until the bot is shut down (e.g., via Ctrl+C).
    ///
    /// # Errors
    /// Returns an error if the client fails to start or encounters a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), BotError> {
        info!("Starting Discord bot");

        self.client.start().await.map_err(|e| {
            BotError::new(BotErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })?;

        Ok(())
    }
}
