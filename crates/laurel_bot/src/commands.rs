//! Administrative slash commands.
//!
//! `/settings` reads and writes the per-guild configuration, `/generate`
//! (re)posts the entry-point message, and `/backup-info` summarizes the
//! backup ledger. All three are registered with a Manage Server default
//! permission and re-checked per invocation, since Discord admins can
//! override command permissions after registration.

use crate::context::BotContext;
use crate::error::{BotError, BotErrorKind, BotResult};
use crate::pipeline;
use crate::ui;
use serenity::all::{
    Command, CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    GuildId, PartialChannel, PartialGuild, Permissions, ResolvedOption, ResolvedValue, Role,
    UserId,
};
use tracing::{debug, error, info, instrument};

/// Shown in `/settings list` for absent or dangling references.
const NOT_SET: &str = "not set or invalid";

/// The global command set.
pub fn command_definitions() -> Vec<CreateCommand> {
    let channel_option = |name: &str, description: &str| {
        CreateCommandOption::new(CommandOptionType::SubCommand, name, description).add_sub_option(
            CreateCommandOption::new(CommandOptionType::Channel, "channel", "Target channel")
                .required(true),
        )
    };
    let role_option = |name: &str, description: &str| {
        CreateCommandOption::new(CommandOptionType::SubCommand, name, description).add_sub_option(
            CreateCommandOption::new(CommandOptionType::Role, "role", "Target role")
                .required(true),
        )
    };

    let settings = CreateCommand::new("settings")
        .description("Configure the review system")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .dm_permission(false)
        .add_option(channel_option(
            "set-review-channel",
            "Channel carrying the review entry message",
        ))
        .add_option(channel_option(
            "set-testimonial-channel",
            "Channel where testimonials are posted",
        ))
        .add_option(role_option(
            "set-staff-role",
            "Role whose members can be reviewed",
        ))
        .add_option(role_option(
            "set-reward-role",
            "Role granted to reviewers after posting",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "clear",
            "Erase every review setting for this server",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "list",
            "Show the current review settings",
        ));

    let generate = CreateCommand::new("generate")
        .description("Post or repost the review entry message")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .dm_permission(false);

    let backup_info = CreateCommand::new("backup-info")
        .description("Summarize the review backup ledger for this server")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .dm_permission(false);

    vec![settings, generate, backup_info]
}

/// Register the command set globally. Failures are logged per command and
/// never abort startup.
pub async fn register_global(ctx: &Context) {
    for command in command_definitions() {
        match Command::create_global_command(&ctx.http, command).await {
            Ok(registered) => debug!(name = %registered.name, "Registered global command"),
            Err(err) => error!(error = %err, "Global command registration failed"),
        }
    }
    info!("Global command registration complete");
}

/// Route a command interaction to its handler, returning the ephemeral reply.
///
/// # Errors
/// Fails when invoked outside a guild, without Manage Server, or when the
/// handler itself fails; the caller renders the error's user message.
#[instrument(skip(ctx, cmd, bot), fields(command = %cmd.data.name, user_id = cmd.user.id.get()))]
pub async fn dispatch(
    ctx: &Context,
    cmd: &CommandInteraction,
    bot: &BotContext,
) -> BotResult<String> {
    let guild_id = cmd
        .guild_id
        .ok_or_else(|| BotError::new(BotErrorKind::GuildOnly))?;
    require_manage_guild(cmd)?;

    match cmd.data.name.as_str() {
        "settings" => handle_settings(ctx, cmd, bot, guild_id).await,
        "generate" => handle_generate(ctx, bot, guild_id).await,
        "backup-info" => handle_backup_info(bot, guild_id).await,
        other => Err(BotError::new(BotErrorKind::Platform(format!(
            "unknown command {other}"
        )))),
    }
}

fn require_manage_guild(cmd: &CommandInteraction) -> BotResult<()> {
    let permissions = cmd.member.as_deref().and_then(|member| member.permissions);
    match permissions {
        Some(permissions) if permissions.contains(Permissions::MANAGE_GUILD) => Ok(()),
        _ => Err(BotError::new(BotErrorKind::Unauthorized(
            "Manage Server".to_string(),
        ))),
    }
}

async fn handle_settings(
    ctx: &Context,
    cmd: &CommandInteraction,
    bot: &BotContext,
    guild_id: GuildId,
) -> BotResult<String> {
    let options = cmd.data.options();
    let Some(sub) = options.first() else {
        return Err(BotError::new(BotErrorKind::Platform(
            "missing subcommand".to_string(),
        )));
    };

    match (sub.name, &sub.value) {
        ("set-review-channel", ResolvedValue::SubCommand(args)) => {
            let channel = channel_arg(args)?;
            set_review_channel(ctx, bot, guild_id, channel.id.get()).await
        }
        ("set-testimonial-channel", ResolvedValue::SubCommand(args)) => {
            let channel = channel_arg(args)?;
            set_testimonial_channel(bot, guild_id, channel.id.get()).await
        }
        ("set-staff-role", ResolvedValue::SubCommand(args)) => {
            let role = role_arg(args)?;
            set_staff_role(bot, guild_id, role).await
        }
        ("set-reward-role", ResolvedValue::SubCommand(args)) => {
            let role = role_arg(args)?;
            set_reward_role(ctx, bot, guild_id, role).await
        }
        ("clear", _) => clear_settings(bot, guild_id).await,
        ("list", _) => list_settings(ctx, bot, guild_id).await,
        (other, _) => Err(BotError::new(BotErrorKind::Platform(format!(
            "unknown subcommand {other}"
        )))),
    }
}

fn channel_arg<'a>(args: &'a [ResolvedOption<'a>]) -> BotResult<&'a PartialChannel> {
    args.iter()
        .find_map(|option| match &option.value {
            ResolvedValue::Channel(channel) => Some(*channel),
            _ => None,
        })
        .ok_or_else(|| BotError::new(BotErrorKind::Platform("channel option missing".to_string())))
}

fn role_arg<'a>(args: &'a [ResolvedOption<'a>]) -> BotResult<&'a Role> {
    args.iter()
        .find_map(|option| match &option.value {
            ResolvedValue::Role(role) => Some(*role),
            _ => None,
        })
        .ok_or_else(|| BotError::new(BotErrorKind::Platform("role option missing".to_string())))
}

async fn set_review_channel(
    ctx: &Context,
    bot: &BotContext,
    guild_id: GuildId,
    channel_id: u64,
) -> BotResult<String> {
    let updated = bot
        .settings()
        .update(guild_id.get(), |config| {
            config.review_channel = Some(channel_id);
        })
        .await?;

    let mut reply = format!("✅ Review channel set to <#{channel_id}>.");
    if updated.ready_to_generate() {
        post_entry_message(ctx, bot, guild_id, channel_id).await?;
        reply.push_str("\n📌 The review entry message has been posted.");
    }
    Ok(reply)
}

async fn set_testimonial_channel(
    bot: &BotContext,
    guild_id: GuildId,
    channel_id: u64,
) -> BotResult<String> {
    bot.settings()
        .update(guild_id.get(), |config| {
            config.testimonial_channel = Some(channel_id);
        })
        .await?;
    Ok(format!("✅ Testimonial channel set to <#{channel_id}>."))
}

async fn set_staff_role(bot: &BotContext, guild_id: GuildId, role: &Role) -> BotResult<String> {
    validate_assignable(guild_id, role)?;

    bot.settings()
        .update(guild_id.get(), |config| {
            config.reviewable_role = Some(role.id.get());
        })
        .await?;
    Ok(format!("✅ Staff role set to **{}**.", role.name))
}

async fn set_reward_role(
    ctx: &Context,
    bot: &BotContext,
    guild_id: GuildId,
    role: &Role,
) -> BotResult<String> {
    validate_assignable(guild_id, role)?;

    // The grant in the pipeline needs the bot's top role above the reward
    // role; reject here so the config never holds an ungrantable role.
    let bot_user_id = bot.bot_user().ok_or_else(|| {
        BotError::new(BotErrorKind::Platform("own user ID not yet known".to_string()))
    })?;
    let guild = guild_id.to_partial_guild(&ctx.http).await?;
    let bot_member = guild_id.member(&ctx.http, UserId::new(bot_user_id)).await?;
    let top_position = bot_member
        .roles
        .iter()
        .filter_map(|id| guild.roles.get(id))
        .map(|bot_role| bot_role.position)
        .max()
        .unwrap_or_default();
    if !reward_role_assignable(role.position, top_position) {
        return Err(BotError::new(BotErrorKind::RoleAboveBot(role.name.clone())));
    }

    bot.settings()
        .update(guild_id.get(), |config| {
            config.reward_role = Some(role.id.get());
        })
        .await?;
    Ok(format!("✅ Reward role set to **{}**.", role.name))
}

/// The bot can only grant roles strictly below its own highest role.
fn reward_role_assignable(role_position: u16, bot_top_position: u16) -> bool {
    role_position < bot_top_position
}

/// Reject the everyone role and integration-managed roles.
fn validate_assignable(guild_id: GuildId, role: &Role) -> BotResult<()> {
    // The everyone role shares the guild's ID.
    if role.id.get() == guild_id.get() {
        return Err(BotError::new(BotErrorKind::EveryoneRole));
    }
    if role.managed {
        return Err(BotError::new(BotErrorKind::ManagedRole(role.name.clone())));
    }
    Ok(())
}

async fn clear_settings(bot: &BotContext, guild_id: GuildId) -> BotResult<String> {
    let removed = bot.settings().clear(guild_id.get()).await?;
    if removed {
        Ok("✅ All review settings cleared for this server.".to_string())
    } else {
        Ok("ℹ️ There were no review settings to clear.".to_string())
    }
}

async fn list_settings(ctx: &Context, bot: &BotContext, guild_id: GuildId) -> BotResult<String> {
    let config = bot.settings().get(guild_id.get()).await.unwrap_or_default();
    let guild = guild_id.to_partial_guild(&ctx.http).await?;

    let review_channel = channel_reference(ctx, guild_id, config.review_channel).await;
    let testimonial_channel = channel_reference(ctx, guild_id, config.testimonial_channel).await;
    let staff_role = role_reference(&guild, config.reviewable_role);
    let reward_role = role_reference(&guild, config.reward_role);
    let entry_message = config
        .review_message_id
        .map(|id| format!("`{id}`"))
        .unwrap_or_else(|| NOT_SET.to_string());

    Ok(format!(
        "📋 **Review system settings**\n\
         Review channel: {review_channel}\n\
         Testimonial channel: {testimonial_channel}\n\
         Staff role: {staff_role}\n\
         Reward role: {reward_role}\n\
         Entry message: {entry_message}"
    ))
}

async fn channel_reference(ctx: &Context, guild_id: GuildId, channel_id: Option<u64>) -> String {
    match channel_id {
        Some(id) => match pipeline::resolve_guild_channel(ctx, guild_id, id).await {
            Some(channel) => format!("<#{}>", channel.id.get()),
            None => NOT_SET.to_string(),
        },
        None => NOT_SET.to_string(),
    }
}

fn role_reference(guild: &PartialGuild, role_id: Option<u64>) -> String {
    match role_id {
        Some(id) if guild.roles.values().any(|role| role.id.get() == id) => format!("<@&{id}>"),
        _ => NOT_SET.to_string(),
    }
}

async fn handle_generate(ctx: &Context, bot: &BotContext, guild_id: GuildId) -> BotResult<String> {
    let config = bot.settings().get(guild_id.get()).await.unwrap_or_default();
    let (Some(channel_id), Some(_)) = (config.review_channel, config.testimonial_channel) else {
        let missing = if config.review_channel.is_none() {
            "review channel"
        } else {
            "testimonial channel"
        };
        return Err(BotError::new(BotErrorKind::MissingConfig(missing.to_string())));
    };

    post_entry_message(ctx, bot, guild_id, channel_id).await?;
    Ok("✅ The review entry message has been posted.".to_string())
}

async fn handle_backup_info(bot: &BotContext, guild_id: GuildId) -> BotResult<String> {
    let stats = bot.backup().stats(guild_id.get()).await;
    Ok(format!(
        "🗂️ **Backup ledger**\n\
         Records: {}\n\
         Unique reviewers: {}\n\
         Unique members reviewed: {}",
        stats.total_records, stats.unique_reviewers, stats.unique_reviewed
    ))
}

/// Post the entry-point message and record its ID for reattachment.
///
/// # Errors
/// Fails when the channel no longer resolves, the post is rejected, or the
/// recorded message ID cannot be persisted.
pub(crate) async fn post_entry_message(
    ctx: &Context,
    bot: &BotContext,
    guild_id: GuildId,
    channel_id: u64,
) -> BotResult<u64> {
    let channel = pipeline::resolve_guild_channel(ctx, guild_id, channel_id)
        .await
        .ok_or_else(|| BotError::new(BotErrorKind::ChannelMissing(channel_id)))?;

    let message = channel
        .id
        .send_message(&ctx.http, ui::entry_message())
        .await?;
    bot.settings()
        .update(guild_id.get(), |config| {
            config.review_message_id = Some(message.id.get());
        })
        .await?;

    info!(
        guild_id = guild_id.get(),
        message_id = message.id.get(),
        "Posted entry-point message"
    );
    Ok(message.id.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definitions_cover_admin_surface() {
        let definitions = command_definitions();
        let json = serde_json::to_value(&definitions).unwrap();

        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|command| command["name"].as_str())
            .collect();
        assert_eq!(names, vec!["settings", "generate", "backup-info"]);
    }

    #[test]
    fn test_settings_subcommands() {
        let definitions = command_definitions();
        let json = serde_json::to_value(&definitions).unwrap();

        let subcommands: Vec<&str> = json[0]["options"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|option| option["name"].as_str())
            .collect();
        assert_eq!(
            subcommands,
            vec![
                "set-review-channel",
                "set-testimonial-channel",
                "set-staff-role",
                "set-reward-role",
                "clear",
                "list"
            ]
        );
    }

    #[test]
    fn test_reward_role_must_sit_below_bot_top_role() {
        // At or above the bot's top role is rejected before any config write.
        assert!(!reward_role_assignable(5, 5));
        assert!(!reward_role_assignable(6, 5));
        assert!(reward_role_assignable(4, 5));
    }

    #[test]
    fn test_commands_locked_to_guilds() {
        let definitions = command_definitions();
        let json = serde_json::to_value(&definitions).unwrap();

        for command in json.as_array().unwrap() {
            assert_eq!(command["dm_permission"], serde_json::json!(false));
        }
    }
}
