//! Persistent UI reattachment.
//!
//! Interaction routing is custom-ID based, so a restart never invalidates
//! old entry-point messages; this pass refreshes their component rows and
//! confirms each recorded message still exists. One guild's failure is
//! logged and never blocks the rest.

use crate::context::BotContext;
use crate::error::{BotError, BotErrorKind, BotResult};
use crate::pipeline;
use crate::ui;
use serenity::all::{Context, EditMessage, GuildId, MessageId};
use tracing::{info, instrument, warn};

/// Reattach the entry-point components for every guild that recorded one.
#[instrument(skip(ctx, bot))]
pub async fn reattach_all(ctx: &Context, bot: &BotContext) {
    let configs = bot.settings().load().await;
    let mut reattached = 0usize;

    for (guild_id, config) in configs {
        let (Some(channel_id), Some(message_id)) =
            (config.review_channel, config.review_message_id)
        else {
            continue;
        };
        if guild_id == 0 || message_id == 0 {
            continue;
        }

        match reattach_entry(ctx, GuildId::new(guild_id), channel_id, message_id).await {
            Ok(()) => reattached += 1,
            Err(err) => warn!(guild_id, error = %err, "Entry message reattachment failed"),
        }
    }

    info!(reattached, "Reattached entry-point messages");
}

async fn reattach_entry(
    ctx: &Context,
    guild_id: GuildId,
    channel_id: u64,
    message_id: u64,
) -> BotResult<()> {
    let channel = pipeline::resolve_guild_channel(ctx, guild_id, channel_id)
        .await
        .ok_or_else(|| BotError::new(BotErrorKind::ChannelMissing(channel_id)))?;

    let mut message = channel
        .id
        .message(&ctx.http, MessageId::new(message_id))
        .await?;
    message
        .edit(
            &ctx.http,
            EditMessage::new().components(ui::entry_components()),
        )
        .await?;
    Ok(())
}
