//! Per-guild configuration for the review system.

use serde::{Deserialize, Serialize};

/// Configuration for one guild, keyed by guild ID in the settings store.
///
/// A config may exist with any subset of fields populated; an absent field
/// disables the dependent feature instead of erroring. Field names serialize
/// in camelCase to match the on-disk settings format.
///
/// # Examples
///
/// ```
/// use laurel_core::GuildConfig;
///
/// let mut config = GuildConfig::default();
/// assert!(!config.ready_to_generate());
///
/// config.review_channel = Some(100);
/// config.testimonial_channel = Some(200);
/// assert!(config.ready_to_generate());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildConfig {
    /// Channel carrying the entry-point message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_channel: Option<u64>,
    /// Channel where testimonials are posted publicly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonial_channel: Option<u64>,
    /// Role restricting who can be reviewed; unset falls back to the
    /// elevated-permission heuristic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewable_role: Option<u64>,
    /// Role granted to a reviewer after a successful submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_role: Option<u64>,
    /// ID of the currently live entry-point message, overwritten on repost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_message_id: Option<u64>,
}

impl GuildConfig {
    /// Both channels required before the entry-point message can be generated.
    pub fn ready_to_generate(&self) -> bool {
        self.review_channel.is_some() && self.testimonial_channel.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_field_names() {
        let config = GuildConfig {
            review_channel: Some(1),
            testimonial_channel: Some(2),
            reviewable_role: Some(3),
            reward_role: Some(4),
            review_message_id: Some(5),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"reviewChannel\":1"));
        assert!(json.contains("\"testimonialChannel\":2"));
        assert!(json.contains("\"reviewableRole\":3"));
        assert!(json.contains("\"rewardRole\":4"));
        assert!(json.contains("\"reviewMessageId\":5"));
    }

    #[test]
    fn test_unset_fields_omitted() {
        let config = GuildConfig {
            review_channel: Some(1),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("reviewChannel"));
        assert!(!json.contains("testimonialChannel"));
        assert!(!json.contains("rewardRole"));
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: GuildConfig =
            serde_json::from_str(r#"{"testimonialChannel": 42}"#).unwrap();
        assert_eq!(config.testimonial_channel, Some(42));
        assert_eq!(config.review_channel, None);
        assert!(!config.ready_to_generate());
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let config: GuildConfig =
            serde_json::from_str(r#"{"reviewChannel": 1, "legacyField": true}"#).unwrap();
        assert_eq!(config.review_channel, Some(1));
    }
}
