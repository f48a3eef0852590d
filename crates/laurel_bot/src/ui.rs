//! UI builders for the review flow.
//!
//! Every builder takes the IDs it needs by value and returns a Serenity
//! builder value; no closure captures ambient state. Component routing is
//! custom-ID based, so the IDs here are the registry of everything the
//! interaction handler dispatches on.

use crate::pool::PoolEntry;
use laurel_core::{MAX_CONTENT_LEN, MIN_CONTENT_LEN};
use serenity::all::{
    ButtonStyle, Colour, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
    CreateInputText, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, CreateModal, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, InputTextStyle,
};

/// Custom ID of the persistent entry-point button.
pub const ENTRY_BUTTON_ID: &str = "review:start";

/// Custom ID of the reviewee selection menu.
pub const SELECT_MENU_ID: &str = "review:select";

/// Custom ID prefix of the review modal; the target user ID follows it.
pub const MODAL_ID_PREFIX: &str = "review:modal:";

/// Custom ID of the text input inside the review modal.
pub const MODAL_CONTENT_ID: &str = "review_content";

/// The entry-point embed shown above the review button.
pub fn entry_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("💬 Leave a Review")
        .description(
            "Know a staff member who went above and beyond? \
             Click the button below to leave them a review.",
        )
        .colour(Colour::BLURPLE)
}

/// The action row carrying the entry-point button.
pub fn entry_components() -> Vec<CreateActionRow> {
    vec![CreateActionRow::Buttons(vec![
        CreateButton::new(ENTRY_BUTTON_ID)
            .label("Leave a Review")
            .style(ButtonStyle::Primary),
    ])]
}

/// The complete entry-point message: embed plus button.
pub fn entry_message() -> CreateMessage {
    CreateMessage::new()
        .embed(entry_embed())
        .components(entry_components())
}

/// Ephemeral followup offering the reviewee pool.
pub fn selection_followup(entries: &[PoolEntry]) -> CreateInteractionResponseFollowup {
    let options = entries
        .iter()
        .map(|entry| {
            CreateSelectMenuOption::new(entry.display_name.clone(), entry.user_id.to_string())
        })
        .collect();

    let menu = CreateSelectMenu::new(SELECT_MENU_ID, CreateSelectMenuKind::String { options })
        .placeholder("Select a user to review")
        .min_values(1)
        .max_values(1);

    CreateInteractionResponseFollowup::new()
        .content("Who would you like to review?")
        .components(vec![CreateActionRow::SelectMenu(menu)])
        .ephemeral(true)
}

/// The review text-entry modal for the selected target.
pub fn review_modal(target_id: u64, target_name: &str) -> CreateModal {
    // Modal titles cap at 45 characters
    let title: String = format!("Review {target_name}").chars().take(45).collect();

    let input = CreateInputText::new(InputTextStyle::Paragraph, "Your review", MODAL_CONTENT_ID)
        .placeholder("What makes this person a great part of the community?")
        .min_length(MIN_CONTENT_LEN as u16)
        .max_length(MAX_CONTENT_LEN as u16)
        .required(true);

    CreateModal::new(modal_custom_id(target_id), title)
        .components(vec![CreateActionRow::InputText(input)])
}

/// Custom ID carrying the review target through the modal round trip.
pub fn modal_custom_id(target_id: u64) -> String {
    format!("{MODAL_ID_PREFIX}{target_id}")
}

/// Recover the review target from a modal custom ID.
pub fn parse_modal_target(custom_id: &str) -> Option<u64> {
    custom_id.strip_prefix(MODAL_ID_PREFIX)?.parse().ok()
}

/// The public testimonial embed.
pub fn testimonial_embed(
    target_id: u64,
    target_name: &str,
    reviewer_name: &str,
    content: &str,
    seed: u64,
) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("⭐ Testimonial for {target_name} ⭐"))
        .description(format!("<@{target_id}>\n\n{content}"))
        .footer(CreateEmbedFooter::new(format!("Review by {reviewer_name}")))
        .colour(accent_colour(seed))
}

/// A plain ephemeral message response.
pub fn ephemeral_message(content: impl Into<String>) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

/// Derive a stable pseudo-random accent colour from a seed.
fn accent_colour(seed: u64) -> Colour {
    let mixed = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    Colour::new(((mixed >> 40) as u32) & 0xFF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_custom_id_round_trip() {
        let custom_id = modal_custom_id(123456789012345678);
        assert_eq!(parse_modal_target(&custom_id), Some(123456789012345678));
    }

    #[test]
    fn test_parse_rejects_foreign_ids() {
        assert_eq!(parse_modal_target("review:start"), None);
        assert_eq!(parse_modal_target("review:modal:"), None);
        assert_eq!(parse_modal_target("review:modal:not-a-number"), None);
    }

    #[test]
    fn test_accent_colour_in_rgb_range() {
        for seed in [0u64, 1, 42, u64::MAX] {
            let colour = accent_colour(seed);
            assert!(colour.0 <= 0xFF_FFFF);
        }
    }
}
