//! Content sanitization for submitted reviews.

use regex::Regex;
use tracing::{debug, instrument};

/// Maximum length of review content in characters.
pub const MAX_CONTENT_LEN: usize = 1000;

/// Minimum length of trimmed review content in characters.
pub const MIN_CONTENT_LEN: usize = 10;

/// Characters used for platform markup abuse, stripped from all content.
const FORMATTING_CHARS: [char; 5] = ['*', '_', '~', '`', '|'];

/// Maximum combined user/channel mention tokens before content is flagged.
const MAX_MENTIONS: usize = 3;

/// Result of sanitizing raw review content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedContent {
    /// Cleaned text with formatting characters removed, capped in length
    pub text: String,
    /// Whether the raw text matched a suspicious pattern; advisory only,
    /// never blocks posting
    pub suspicious: bool,
}

/// Sanitizer applied to every review before it is stored or posted.
///
/// Strips Discord formatting-control characters, truncates to
/// [`MAX_CONTENT_LEN`], and flags content matching a fixed set of suspicious
/// patterns: broadcast mentions, invite and URL shorteners, bulk role-mention
/// tokens, or more than [`MAX_MENTIONS`] combined user/channel mentions.
/// Pattern checks run against the raw text, before stripping.
///
/// # Examples
///
/// ```
/// use laurel_core::ContentSanitizer;
///
/// let sanitizer = ContentSanitizer::new();
/// let result = sanitizer.sanitize("**Great** mentor, always patient");
/// assert_eq!(result.text, "Great mentor, always patient");
/// assert!(!result.suspicious);
/// ```
pub struct ContentSanitizer {
    suspicious_patterns: Vec<Regex>,
    mention_regex: Regex,
}

impl ContentSanitizer {
    /// Create a sanitizer with the fixed pattern set.
    pub fn new() -> Self {
        let suspicious_patterns = vec![
            // Broadcast mention tokens
            Regex::new(r"@everyone|@here").expect("Valid broadcast regex"),
            // Invite-link shorteners
            Regex::new(r"(?i)discord\.gg/|discord(?:app)?\.com/invite/")
                .expect("Valid invite regex"),
            // Generic URL shorteners
            Regex::new(r"(?i)\b(?:bit\.ly|tinyurl\.com|t\.co|goo\.gl)/")
                .expect("Valid shortener regex"),
            // Bulk role-mention token
            Regex::new(r"<@&\d{17,19}>").expect("Valid role mention regex"),
        ];

        // Regex for Discord user and channel mentions:
        // <@123456789012345678>, <@!123456789012345678>, or <#123456789012345678>
        let mention_regex = Regex::new(r"<@!?\d{17,19}>|<#\d{17,19}>")
            .expect("Valid mention regex");

        Self {
            suspicious_patterns,
            mention_regex,
        }
    }

    /// Sanitize raw review content.
    #[instrument(skip(self, raw), fields(raw_len = raw.len()))]
    pub fn sanitize(&self, raw: &str) -> SanitizedContent {
        let suspicious = self.is_suspicious(raw);

        let text: String = raw
            .chars()
            .filter(|c| !FORMATTING_CHARS.contains(c))
            .take(MAX_CONTENT_LEN)
            .collect();

        debug!(
            clean_len = text.len(),
            suspicious, "Sanitized review content"
        );

        SanitizedContent { text, suspicious }
    }

    /// Check the raw text against the fixed suspicious-pattern set.
    fn is_suspicious(&self, raw: &str) -> bool {
        if self
            .suspicious_patterns
            .iter()
            .any(|pattern| pattern.is_match(raw))
        {
            debug!("Content matches a suspicious pattern");
            return true;
        }

        let mention_count = self.mention_regex.find_iter(raw).count();
        if mention_count > MAX_MENTIONS {
            debug!(mention_count, "Content exceeds mention threshold");
            return true;
        }

        false
    }
}

impl Default for ContentSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_formatting_characters() {
        let sanitizer = ContentSanitizer::new();

        for c in FORMATTING_CHARS {
            let raw = format!("great {c}work{c} all around");
            let result = sanitizer.sanitize(&raw);
            assert!(
                !result.text.contains(c),
                "expected {c:?} to be stripped from {:?}",
                result.text
            );
        }
    }

    #[test]
    fn test_truncates_to_max_length() {
        let sanitizer = ContentSanitizer::new();
        let result = sanitizer.sanitize(&"x".repeat(MAX_CONTENT_LEN + 500));
        assert_eq!(result.text.chars().count(), MAX_CONTENT_LEN);
    }

    #[test]
    fn test_short_content_unchanged() {
        let sanitizer = ContentSanitizer::new();
        let result = sanitizer.sanitize("helped me debug a gnarly race condition");
        assert_eq!(result.text, "helped me debug a gnarly race condition");
        assert!(!result.suspicious);
    }

    #[test]
    fn test_broadcast_mentions_flagged() {
        let sanitizer = ContentSanitizer::new();
        assert!(sanitizer.sanitize("hey @everyone look").suspicious);
        assert!(sanitizer.sanitize("hey @here look").suspicious);
    }

    #[test]
    fn test_invite_shorteners_flagged() {
        let sanitizer = ContentSanitizer::new();
        assert!(sanitizer.sanitize("join discord.gg/abc123").suspicious);
        assert!(
            sanitizer
                .sanitize("join discord.com/invite/abc123")
                .suspicious
        );
    }

    #[test]
    fn test_url_shorteners_flagged() {
        let sanitizer = ContentSanitizer::new();
        assert!(sanitizer.sanitize("see bit.ly/xyz").suspicious);
        assert!(sanitizer.sanitize("see tinyurl.com/xyz").suspicious);
        assert!(sanitizer.sanitize("see t.co/xyz").suspicious);
    }

    #[test]
    fn test_role_mention_flagged() {
        let sanitizer = ContentSanitizer::new();
        assert!(sanitizer.sanitize("thanks <@&123456789012345678>").suspicious);
    }

    #[test]
    fn test_mention_threshold() {
        let sanitizer = ContentSanitizer::new();

        let three = "<@123456789012345678> <@123456789012345679> <#123456789012345680>";
        assert!(!sanitizer.sanitize(three).suspicious);

        let four = format!("{three} <@!123456789012345681>");
        assert!(sanitizer.sanitize(&four).suspicious);
    }

    #[test]
    fn test_plain_mention_not_flagged() {
        let sanitizer = ContentSanitizer::new();
        let result = sanitizer.sanitize("<@123456789012345678> is a great moderator");
        assert!(!result.suspicious);
    }

    #[test]
    fn test_suspicion_checked_before_strip() {
        let sanitizer = ContentSanitizer::new();
        // The raw text matches the invite pattern even though stripping
        // would leave it matching anyway; the flag must reflect the raw form.
        let result = sanitizer.sanitize("`discord.gg/abc`");
        assert!(result.suspicious);
        assert_eq!(result.text, "discord.gg/abc");
    }
}
