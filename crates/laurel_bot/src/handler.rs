//! Gateway event handler.
//!
//! Routes interactions by custom ID into the submission pipeline and the
//! command dispatcher. Every interaction is acknowledged exactly once; a
//! second acknowledgment attempt surfaces as a Serenity error here and is
//! logged at debug and discarded.

use crate::commands;
use crate::context::BotContext;
use crate::error::{BotError, ErrorCategory};
use crate::pipeline;
use crate::reattach;
use crate::ui;
use async_trait::async_trait;
use serenity::all::{
    Context, CreateInteractionResponseFollowup, EventHandler, GatewayIntents, Interaction, Ready,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Serenity event handler wiring gateway events to the pipeline.
pub struct LaurelHandler {
    context: Arc<BotContext>,
}

impl LaurelHandler {
    /// Create a handler around the shared context.
    pub fn new(context: Arc<BotContext>) -> Self {
        Self { context }
    }

    /// Gateway intents the handler needs: guilds for channel and role
    /// lookups, members for pool construction.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS
    }
}

#[async_trait]
impl EventHandler for LaurelHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );
        self.context.set_bot_user(ready.user.id.get());

        commands::register_global(&ctx).await;
        reattach::reattach_all(&ctx, &self.context).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(cmd) => {
                // Command handlers may post messages and walk the guild, so
                // defer past the acknowledgment window first.
                if let Err(err) = cmd.defer_ephemeral(&ctx.http).await {
                    debug!(error = %err, "Command defer failed (already acknowledged or expired)");
                }
                let reply = commands::dispatch(&ctx, &cmd, &self.context)
                    .await
                    .unwrap_or_else(|err| {
                        report(&err);
                        err.kind().user_message()
                    });
                if let Err(err) = cmd
                    .create_followup(
                        &ctx.http,
                        CreateInteractionResponseFollowup::new()
                            .content(reply)
                            .ephemeral(true),
                    )
                    .await
                {
                    debug!(error = %err, "Command followup not delivered (already acknowledged or expired)");
                }
            }
            Interaction::Component(component) => match component.data.custom_id.as_str() {
                ui::ENTRY_BUTTON_ID => {
                    // Walking the member list can exceed the acknowledgment
                    // window, so defer and deliver the menu as a followup.
                    if let Err(err) = component.defer_ephemeral(&ctx.http).await {
                        debug!(error = %err, "Entry defer failed (already acknowledged or expired)");
                    }
                    let followup = pipeline::begin_submission(&ctx, &component, &self.context)
                        .await
                        .unwrap_or_else(|err| {
                            report(&err);
                            CreateInteractionResponseFollowup::new()
                                .content(err.kind().user_message())
                                .ephemeral(true)
                        });
                    if let Err(err) = component.create_followup(&ctx.http, followup).await {
                        debug!(error = %err, "Selection followup not delivered (already acknowledged or expired)");
                    }
                }
                ui::SELECT_MENU_ID => {
                    // The selection response must be a modal, so this path
                    // cannot defer.
                    let response = pipeline::handle_selection(&ctx, &component)
                        .await
                        .unwrap_or_else(|err| {
                            report(&err);
                            ui::ephemeral_message(err.kind().user_message())
                        });
                    if let Err(err) = component.create_response(&ctx.http, response).await {
                        debug!(error = %err, "Component response not delivered (already acknowledged or expired)");
                    }
                }
                _ => {}
            },
            Interaction::Modal(modal) => {
                if !modal.data.custom_id.starts_with(ui::MODAL_ID_PREFIX) {
                    return;
                }
                // Backup, post, and reward grant can exceed the window.
                if let Err(err) = modal.defer_ephemeral(&ctx.http).await {
                    debug!(error = %err, "Modal defer failed (already acknowledged or expired)");
                }
                let reply = pipeline::complete_submission(&ctx, &modal, &self.context)
                    .await
                    .unwrap_or_else(|err| {
                        report(&err);
                        err.kind().user_message()
                    });
                if let Err(err) = modal
                    .create_followup(
                        &ctx.http,
                        CreateInteractionResponseFollowup::new()
                            .content(reply)
                            .ephemeral(true),
                    )
                    .await
                {
                    debug!(error = %err, "Modal followup not delivered (already acknowledged or expired)");
                }
            }
            _ => {}
        }
    }
}

/// Log a failed interaction at a severity matching its category.
fn report(err: &BotError) {
    match err.kind().category() {
        ErrorCategory::UserInput => debug!(error = %err, "Interaction rejected"),
        category => warn!(%category, error = %err, "Interaction failed"),
    }
}
