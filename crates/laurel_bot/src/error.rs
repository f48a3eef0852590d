//! Bot-specific error types.
//!
//! Every collaborator-facing function returns an explicit error kind; the
//! interaction dispatcher matches kinds to the ephemeral message shown to the
//! user instead of catching platform errors ad hoc.

use derive_getters::Getters;
use laurel_core::MIN_CONTENT_LEN;

/// Broad error categories used for logging and reporting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorCategory {
    /// Recoverable by the submitter retrying the flow
    #[display("user input")]
    UserInput,
    /// Requires an admin to fix the guild configuration
    #[display("configuration")]
    Configuration,
    /// Requires an admin to adjust Discord permissions
    #[display("permission")]
    Permission,
    /// Store read/write failure
    #[display("persistence")]
    Persistence,
    /// Discord API or gateway failure
    #[display("platform")]
    Platform,
}

/// Bot error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum BotErrorKind {
    /// Submitter selected themself as the review target.
    #[display("Self-review rejected")]
    SelfReview,

    /// Review content was empty after cleaning.
    #[display("Review content empty after cleaning")]
    ContentEmpty,

    /// Review content was too short after cleaning and trimming.
    #[display("Review content too short: {_0} characters")]
    ContentTooShort(usize),

    /// No members are eligible for review in this guild.
    #[display("No eligible review candidates")]
    NoCandidates,

    /// Interaction arrived outside a guild.
    #[display("Interaction outside a guild")]
    GuildOnly,

    /// A required piece of guild configuration is absent.
    #[display("Missing configuration: {_0}")]
    MissingConfig(String),

    /// A configured channel no longer resolves.
    #[display("Channel not found: {_0}")]
    ChannelMissing(u64),

    /// The selected member left the guild mid-flow.
    #[display("Member no longer in guild: {_0}")]
    TargetGone(u64),

    /// The guild's default role was offered where a real role is required.
    #[display("The everyone role cannot be used")]
    EveryoneRole,

    /// An integration-owned role was offered where an assignable role is required.
    #[display("Managed role cannot be used: {_0}")]
    ManagedRole(String),

    /// The chosen reward role sits at or above the bot's own highest role.
    #[display("Role at or above the bot's top role: {_0}")]
    RoleAboveBot(String),

    /// The invoking user lacks the required guild permission.
    #[display("Caller lacks required permission: {_0}")]
    Unauthorized(String),

    /// The bot lacks a Discord permission for an operation.
    #[display("Insufficient permissions: {_0}")]
    PermissionDenied(String),

    /// A settings store write failed.
    #[display("Store error: {_0}")]
    Store(String),

    /// Serenity API error (HTTP error, gateway error, rate limit).
    #[display("Discord API error: {_0}")]
    Platform(String),

    /// Connection to the Discord gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),
}

impl BotErrorKind {
    /// The broad category this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SelfReview
            | Self::ContentEmpty
            | Self::ContentTooShort(_)
            | Self::GuildOnly
            | Self::TargetGone(_) => ErrorCategory::UserInput,
            Self::NoCandidates
            | Self::MissingConfig(_)
            | Self::ChannelMissing(_)
            | Self::EveryoneRole
            | Self::ManagedRole(_) => ErrorCategory::Configuration,
            Self::RoleAboveBot(_) | Self::Unauthorized(_) | Self::PermissionDenied(_) => {
                ErrorCategory::Permission
            }
            Self::Store(_) => ErrorCategory::Persistence,
            Self::Platform(_) | Self::ConnectionFailed(_) => ErrorCategory::Platform,
        }
    }

    /// The ephemeral message shown to the interacting user.
    pub fn user_message(&self) -> String {
        match self {
            Self::SelfReview => "❌ You can't leave a review about yourself.".to_string(),
            Self::ContentEmpty => "❌ Your review can't be empty.".to_string(),
            Self::ContentTooShort(_) => format!(
                "❌ Your review must be at least {MIN_CONTENT_LEN} characters long."
            ),
            Self::NoCandidates => {
                "❌ There's no one eligible to review right now.".to_string()
            }
            Self::GuildOnly => "❌ This only works inside a server.".to_string(),
            Self::MissingConfig(what) => format!(
                "❌ The review system isn't fully configured yet ({what}). Ask an admin to run `/settings`."
            ),
            Self::ChannelMissing(_) => "❌ Testimonial channel not found.".to_string(),
            Self::TargetGone(_) => {
                "❌ That member is no longer in the server. Please start over.".to_string()
            }
            Self::EveryoneRole => "❌ The @everyone role can't be used here.".to_string(),
            Self::ManagedRole(name) => {
                format!("❌ **{name}** is managed by an integration and can't be used.")
            }
            Self::RoleAboveBot(name) => format!(
                "❌ I can't grant **{name}** because it sits at or above my highest role."
            ),
            Self::Unauthorized(permission) => {
                format!("❌ You need the **{permission}** permission to use this.")
            }
            Self::PermissionDenied(what) => format!("❌ I'm missing permission to {what}."),
            Self::Store(_) => {
                "⚠️ Saving your change failed. Please try again in a moment.".to_string()
            }
            Self::Platform(detail) | Self::ConnectionFailed(detail) => {
                format!("⚠️ Discord returned an error: {}", truncate(detail, 100))
            }
        }
    }
}

/// Bot error with source location tracking.
///
/// Captures the error kind along with the file and line where the error
/// occurred.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Bot Error: {} at line {} in {}", kind, line, file)]
pub struct BotError {
    kind: BotErrorKind,
    line: u32,
    #[getter(skip)]
    file: &'static str,
}

impl BotError {
    /// Get field `file` from instance of `BotError`.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Create a new BotError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use laurel_bot::{BotError, BotErrorKind};
    ///
    /// let err = BotError::new(BotErrorKind::SelfReview);
    /// ```
    #[track_caller]
    pub fn new(kind: BotErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for bot operations.
pub type BotResult<T> = Result<T, BotError>;

// Convenience From implementations for external error types
impl From<serenity::Error> for BotError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        BotError::new(BotErrorKind::Platform(err.to_string()))
    }
}

impl From<laurel_error::LaurelError> for BotError {
    #[track_caller]
    fn from(err: laurel_error::LaurelError) -> Self {
        BotError::new(BotErrorKind::Store(err.to_string()))
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(BotErrorKind::SelfReview.category(), ErrorCategory::UserInput);
        assert_eq!(
            BotErrorKind::MissingConfig("testimonial channel".to_string()).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            BotErrorKind::RoleAboveBot("Helper".to_string()).category(),
            ErrorCategory::Permission
        );
        assert_eq!(
            BotErrorKind::Store("disk full".to_string()).category(),
            ErrorCategory::Persistence
        );
        assert_eq!(
            BotErrorKind::Platform("timeout".to_string()).category(),
            ErrorCategory::Platform
        );
    }

    #[test]
    fn test_platform_message_truncated() {
        let kind = BotErrorKind::Platform("x".repeat(500));
        let message = kind.user_message();
        assert!(message.chars().count() < 150);
        assert!(message.ends_with('…'));
    }

    #[test]
    fn test_error_location_captured() {
        let err = BotError::new(BotErrorKind::SelfReview);
        assert!(err.file().contains("error.rs"));
        assert!(*err.line() > 0);
    }
}
