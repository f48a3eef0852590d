//! The review submission pipeline.
//!
//! Three interaction events drive one submission: the entry-point button
//! ([`begin_submission`]), the reviewee selection ([`handle_selection`]), and
//! the modal submit ([`complete_submission`]). Between events the flow holds
//! no lock and no state beyond the target ID carried in the modal custom ID,
//! so any number of submissions may be in flight at once.
//!
//! Ordering is fixed: the public post is never sent before the backup append
//! is attempted, and the reward grant never runs before the post succeeds.
//! A failed backup append is logged and the pipeline proceeds without a
//! record ID; everything after a successful post only downgrades to warnings.

use crate::context::BotContext;
use crate::error::{BotError, BotErrorKind, BotResult};
use crate::pool::{self, MemberProfile};
use crate::ui;
use chrono::{DateTime, Utc};
use laurel_core::{ReviewRecord, MIN_CONTENT_LEN};
use serenity::all::{
    ActionRowComponent, Channel, ChannelId, ComponentInteraction, ComponentInteractionDataKind,
    Context, CreateInteractionResponse, CreateInteractionResponseFollowup, CreateMessage,
    GuildChannel, GuildId, Member, ModalInteraction, PartialGuild, Permissions, RoleId, UserId,
};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

/// Discord returns at most this many members per list request.
const MEMBER_PAGE_SIZE: u64 = 1000;

/// Outcome of the reward-role grant step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RewardOutcome {
    /// No reward role is configured for the guild.
    NotConfigured,
    /// The role was granted; carries the role name for the confirmation.
    Granted(String),
    /// The submitter already holds the role; grant skipped.
    AlreadyHeld,
    /// The grant failed; downgraded to a warning, never undoes the post.
    Failed,
}

/// Handle the entry-point button: build the reviewee pool and offer it.
///
/// The caller has already deferred the interaction (walking the member list
/// can exceed the acknowledgment window), so the menu arrives as a followup.
///
/// # Errors
/// Fails when the interaction is outside a guild, the testimonial channel is
/// not configured, the member list cannot be fetched, or the pool is empty.
#[instrument(skip(ctx, interaction, bot), fields(user_id = interaction.user.id.get()))]
pub async fn begin_submission(
    ctx: &Context,
    interaction: &ComponentInteraction,
    bot: &BotContext,
) -> BotResult<CreateInteractionResponseFollowup> {
    let guild_id = interaction
        .guild_id
        .ok_or_else(|| BotError::new(BotErrorKind::GuildOnly))?;

    let config = bot.settings().get(guild_id.get()).await.unwrap_or_default();
    if config.testimonial_channel.is_none() {
        return Err(BotError::new(BotErrorKind::MissingConfig(
            "testimonial channel".to_string(),
        )));
    }

    let members = fetch_member_profiles(ctx, guild_id).await?;
    let entries = pool::build_pool(&members, config.reviewable_role);
    if entries.is_empty() {
        return Err(BotError::new(BotErrorKind::NoCandidates));
    }

    debug!(guild_id = guild_id.get(), pool_size = entries.len(), "Offering reviewee pool");
    Ok(ui::selection_followup(&entries))
}

/// Handle the reviewee selection: resolve the target and open the modal.
///
/// # Errors
/// Fails when the submitter selected themself or the target left the guild
/// between pool construction and selection.
#[instrument(skip(ctx, interaction), fields(user_id = interaction.user.id.get()))]
pub async fn handle_selection(
    ctx: &Context,
    interaction: &ComponentInteraction,
) -> BotResult<CreateInteractionResponse> {
    let guild_id = interaction
        .guild_id
        .ok_or_else(|| BotError::new(BotErrorKind::GuildOnly))?;

    let ComponentInteractionDataKind::StringSelect { values } = &interaction.data.kind else {
        return Err(BotError::new(BotErrorKind::Platform(
            "selection payload missing".to_string(),
        )));
    };
    let target_id: u64 = values
        .first()
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| BotError::new(BotErrorKind::Platform("unparseable selection".to_string())))?;

    validate_target(target_id, interaction.user.id.get())?;

    let target = guild_id
        .member(&ctx.http, UserId::new(target_id))
        .await
        .map_err(|_| BotError::new(BotErrorKind::TargetGone(target_id)))?;

    Ok(CreateInteractionResponse::Modal(ui::review_modal(
        target_id,
        target.display_name(),
    )))
}

/// Handle the modal submit: validate, back up, post, and grant the reward.
///
/// Returns the ephemeral confirmation text for the submitter. The caller has
/// already deferred the interaction, so errors surface as a followup.
///
/// # Errors
/// Fails on empty or too-short content, a vanished target, missing or
/// unresolvable testimonial channel, missing send permission, or a Discord
/// API failure while posting. A backup failure alone never fails this.
#[instrument(skip(ctx, interaction, bot), fields(user_id = interaction.user.id.get()))]
pub async fn complete_submission(
    ctx: &Context,
    interaction: &ModalInteraction,
    bot: &BotContext,
) -> BotResult<String> {
    let guild_id = interaction
        .guild_id
        .ok_or_else(|| BotError::new(BotErrorKind::GuildOnly))?;
    let reviewer_id = interaction.user.id.get();

    let target_id = ui::parse_modal_target(&interaction.data.custom_id).ok_or_else(|| {
        BotError::new(BotErrorKind::Platform("modal target missing".to_string()))
    })?;
    validate_target(target_id, reviewer_id)?;

    // Validate content before touching Discord or the stores.
    let raw = extract_modal_content(interaction)
        .ok_or_else(|| BotError::new(BotErrorKind::ContentEmpty))?;
    let sanitized = bot.sanitizer().sanitize(&raw);
    if sanitized.suspicious {
        warn!(
            guild_id = guild_id.get(),
            reviewer_id, "Suspicious content in review submission"
        );
    }
    let content = sanitized.text.trim().to_string();
    if content.is_empty() {
        return Err(BotError::new(BotErrorKind::ContentEmpty));
    }
    let length = content.chars().count();
    if length < MIN_CONTENT_LEN {
        return Err(BotError::new(BotErrorKind::ContentTooShort(length)));
    }

    let config = bot.settings().get(guild_id.get()).await.unwrap_or_default();
    let channel_id = config.testimonial_channel.ok_or_else(|| {
        BotError::new(BotErrorKind::MissingConfig("testimonial channel".to_string()))
    })?;

    // The target may have left since selection.
    let target = guild_id
        .member(&ctx.http, UserId::new(target_id))
        .await
        .map_err(|_| BotError::new(BotErrorKind::TargetGone(target_id)))?;
    let guild = guild_id.to_partial_guild(&ctx.http).await?;
    let reviewer = guild_id.member(&ctx.http, interaction.user.id).await?;

    // Backup before posting; a failed append is logged, not fatal.
    let record = ReviewRecord::new(
        reviewer_id,
        target_id,
        content.clone(),
        interaction_timestamp(interaction),
    );
    let record_id = match bot.backup().append(guild_id.get(), record).await {
        Ok(id) => Some(id),
        Err(err) => {
            error!(
                guild_id = guild_id.get(),
                error = %err,
                "Backup append failed, posting without a record reference"
            );
            None
        }
    };

    let channel = resolve_guild_channel(ctx, guild_id, channel_id)
        .await
        .ok_or_else(|| BotError::new(BotErrorKind::ChannelMissing(channel_id)))?;
    ensure_send_permission(ctx, &guild, &channel, bot).await?;

    let seed = record_id
        .map(|id| id.as_u64_pair().1)
        .unwrap_or(reviewer_id ^ target_id);
    let embed = ui::testimonial_embed(
        target_id,
        target.display_name(),
        reviewer.display_name(),
        &content,
        seed,
    );
    let posted = channel
        .id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await?;
    debug!(
        guild_id = guild_id.get(),
        message_id = posted.id.get(),
        "Posted testimonial"
    );

    let reward = grant_reward(ctx, &guild, &reviewer, config.reward_role).await;
    Ok(confirmation_message(record_id, &reward))
}

/// Reject a submitter picking themself, before any record or post exists.
fn validate_target(target_id: u64, submitter_id: u64) -> BotResult<()> {
    if target_id == submitter_id {
        return Err(BotError::new(BotErrorKind::SelfReview));
    }
    Ok(())
}

/// Fetch every guild member as a detached profile.
///
/// Member listing is paged; pages continue from the highest user ID of the
/// previous page until a short page arrives, so guilds above the page size
/// still contribute their whole roster to the pool.
async fn fetch_member_profiles(ctx: &Context, guild_id: GuildId) -> BotResult<Vec<MemberProfile>> {
    let guild = guild_id.to_partial_guild(&ctx.http).await?;

    let mut profiles = Vec::new();
    let mut after: Option<UserId> = None;
    loop {
        let page = guild_id
            .members(&ctx.http, Some(MEMBER_PAGE_SIZE), after)
            .await?;
        profiles.extend(page.iter().map(|member| profile_from_member(&guild, member)));

        match page_cursor(page.len(), page.last().map(|member| member.user.id.get())) {
            Some(last_id) => after = Some(UserId::new(last_id)),
            None => break,
        }
    }
    Ok(profiles)
}

/// Cursor for the next member page, present only when the page was full.
fn page_cursor(page_len: usize, last_id: Option<u64>) -> Option<u64> {
    if page_len < MEMBER_PAGE_SIZE as usize {
        None
    } else {
        last_id
    }
}

fn profile_from_member(guild: &PartialGuild, member: &Member) -> MemberProfile {
    MemberProfile {
        user_id: member.user.id.get(),
        display_name: member.display_name().to_string(),
        is_bot: member.user.bot,
        role_ids: member.roles.iter().map(|role| role.get()).collect(),
        permissions: aggregate_permissions(guild, member),
    }
}

/// Guild-level permissions from the everyone role plus the member's roles.
fn aggregate_permissions(guild: &PartialGuild, member: &Member) -> Permissions {
    if member.user.id == guild.owner_id {
        return Permissions::all();
    }

    // The everyone role shares the guild's ID.
    let mut permissions = guild
        .roles
        .get(&RoleId::new(guild.id.get()))
        .map(|role| role.permissions)
        .unwrap_or_else(Permissions::empty);
    for role_id in &member.roles {
        if let Some(role) = guild.roles.get(role_id) {
            permissions |= role.permissions;
        }
    }

    if permissions.contains(Permissions::ADMINISTRATOR) {
        Permissions::all()
    } else {
        permissions
    }
}

/// Resolve a stored channel ID to a channel belonging to the guild.
pub(crate) async fn resolve_guild_channel(
    ctx: &Context,
    guild_id: GuildId,
    channel_id: u64,
) -> Option<GuildChannel> {
    if channel_id == 0 {
        return None;
    }
    match ChannelId::new(channel_id).to_channel(&ctx.http).await {
        Ok(Channel::Guild(channel)) if channel.guild_id == guild_id => Some(channel),
        Ok(_) => None,
        Err(_) => None,
    }
}

/// Check the bot can view and send in the testimonial channel.
async fn ensure_send_permission(
    ctx: &Context,
    guild: &PartialGuild,
    channel: &GuildChannel,
    bot: &BotContext,
) -> BotResult<()> {
    let bot_user_id = bot.bot_user().ok_or_else(|| {
        BotError::new(BotErrorKind::Platform("own user ID not yet known".to_string()))
    })?;
    let bot_member = guild.id.member(&ctx.http, UserId::new(bot_user_id)).await?;

    let permissions = guild.user_permissions_in(channel, &bot_member);
    if permissions.contains(Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES) {
        Ok(())
    } else {
        Err(BotError::new(BotErrorKind::PermissionDenied(
            "send messages in the testimonial channel".to_string(),
        )))
    }
}

/// What the reward step should do, decided from config and held roles alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RewardAction {
    /// No reward role configured; nothing to do.
    NotConfigured,
    /// The reviewer already holds the role; no grant is issued.
    AlreadyHeld,
    /// Grant this role, exactly once.
    Grant(u64),
}

fn reward_action(reward_role: Option<u64>, held_roles: &[u64]) -> RewardAction {
    match reward_role {
        None => RewardAction::NotConfigured,
        Some(role_id) if held_roles.contains(&role_id) => RewardAction::AlreadyHeld,
        Some(role_id) => RewardAction::Grant(role_id),
    }
}

/// Grant the configured reward role to the reviewer, at most once.
async fn grant_reward(
    ctx: &Context,
    guild: &PartialGuild,
    reviewer: &Member,
    reward_role: Option<u64>,
) -> RewardOutcome {
    let held: Vec<u64> = reviewer.roles.iter().map(|role_id| role_id.get()).collect();
    let role_id = match reward_action(reward_role, &held) {
        RewardAction::NotConfigured => return RewardOutcome::NotConfigured,
        RewardAction::AlreadyHeld => return RewardOutcome::AlreadyHeld,
        RewardAction::Grant(role_id) => role_id,
    };

    let Some(role) = guild.roles.values().find(|role| role.id.get() == role_id) else {
        warn!(guild_id = guild.id.get(), role_id, "Reward role no longer exists");
        return RewardOutcome::Failed;
    };

    match reviewer.add_role(&ctx.http, role.id).await {
        Ok(()) => RewardOutcome::Granted(role.name.clone()),
        Err(err) => {
            warn!(
                guild_id = guild.id.get(),
                role_id,
                error = %err,
                "Reward role grant failed"
            );
            RewardOutcome::Failed
        }
    }
}

/// Creation time of the originating interaction, from its snowflake ID.
fn interaction_timestamp(interaction: &ModalInteraction) -> DateTime<Utc> {
    let seconds = interaction.id.created_at().unix_timestamp();
    DateTime::from_timestamp(seconds, 0).unwrap_or_else(Utc::now)
}

/// Pull the review text out of the submitted modal rows.
fn extract_modal_content(interaction: &ModalInteraction) -> Option<String> {
    interaction
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == ui::MODAL_CONTENT_ID => {
                input.value.clone()
            }
            _ => None,
        })
}

/// The single ephemeral confirmation combining post, backup, and reward.
fn confirmation_message(record_id: Option<Uuid>, reward: &RewardOutcome) -> String {
    let mut message = String::from("✅ Your review has been posted!");

    match record_id {
        Some(id) => message.push_str(&format!("\n🧾 Backup record `{id}` saved.")),
        None => message.push_str("\n⚠️ The review was posted but could not be backed up."),
    }

    match reward {
        RewardOutcome::NotConfigured => {}
        RewardOutcome::Granted(name) => {
            message.push_str(&format!("\n🎁 You received the **{name}** role!"));
        }
        RewardOutcome::AlreadyHeld => {
            message.push_str("\n🎁 You already have the reward role.");
        }
        RewardOutcome::Failed => {
            message.push_str("\n⚠️ The reward role could not be granted.");
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_review_rejected_before_persistence() {
        let err = validate_target(42, 42).unwrap_err();
        assert_eq!(*err.kind(), BotErrorKind::SelfReview);
    }

    #[test]
    fn test_distinct_target_accepted() {
        assert!(validate_target(42, 43).is_ok());
    }

    #[test]
    fn test_reward_skipped_without_config() {
        assert_eq!(reward_action(None, &[1, 2, 3]), RewardAction::NotConfigured);
    }

    #[test]
    fn test_reward_never_granted_when_already_held() {
        assert_eq!(reward_action(Some(2), &[1, 2, 3]), RewardAction::AlreadyHeld);
    }

    #[test]
    fn test_reward_granted_once_when_missing() {
        assert_eq!(reward_action(Some(9), &[1, 2, 3]), RewardAction::Grant(9));
        assert_eq!(reward_action(Some(9), &[]), RewardAction::Grant(9));
    }

    #[test]
    fn test_full_page_continues_from_last_id() {
        assert_eq!(page_cursor(MEMBER_PAGE_SIZE as usize, Some(777)), Some(777));
    }

    #[test]
    fn test_short_page_ends_pagination() {
        assert_eq!(page_cursor(MEMBER_PAGE_SIZE as usize - 1, Some(777)), None);
        assert_eq!(page_cursor(0, None), None);
    }

    #[test]
    fn test_confirmation_with_record_and_grant() {
        let id = Uuid::new_v4();
        let message =
            confirmation_message(Some(id), &RewardOutcome::Granted("Reviewer".to_string()));

        assert!(message.starts_with("✅ Your review has been posted!"));
        assert!(message.contains(&id.to_string()));
        assert!(message.contains("**Reviewer**"));
    }

    #[test]
    fn test_confirmation_without_record_claims_no_id() {
        let message = confirmation_message(None, &RewardOutcome::NotConfigured);

        assert!(message.contains("could not be backed up"));
        assert!(!message.contains('`'));
    }

    #[test]
    fn test_confirmation_reports_already_held() {
        let message = confirmation_message(Some(Uuid::new_v4()), &RewardOutcome::AlreadyHeld);
        assert!(message.contains("already have the reward role"));
    }

    #[test]
    fn test_confirmation_downgrades_failed_grant() {
        let message = confirmation_message(Some(Uuid::new_v4()), &RewardOutcome::Failed);
        assert!(message.starts_with("✅"));
        assert!(message.contains("could not be granted"));
    }
}
