//! Reviewee pool construction.
//!
//! The pool is the set of members offered in the selection menu. With a
//! staff role configured it is exactly the members holding that role;
//! without one it falls back to members whose permissions mark them as
//! moderators. Selection menus cap at 25 options, so the pool is sorted
//! by display name and truncated deterministically.

use serenity::all::Permissions;
use tracing::instrument;

/// Discord caps string select menus at 25 options.
pub const MAX_POOL_SIZE: usize = 25;

/// The member fields pool construction needs, detached from gateway types.
#[derive(Debug, Clone)]
pub struct MemberProfile {
    /// Discord user ID.
    pub user_id: u64,
    /// Nickname if set, otherwise the username.
    pub display_name: String,
    /// Whether the account is a bot.
    pub is_bot: bool,
    /// IDs of the roles the member holds.
    pub role_ids: Vec<u64>,
    /// Guild-level permissions aggregated from the member's roles.
    pub permissions: Permissions,
}

/// One entry in the selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEntry {
    /// Discord user ID.
    pub user_id: u64,
    /// Label shown in the menu.
    pub display_name: String,
}

/// Build the reviewee pool from a guild's member profiles.
///
/// Bots never appear. With `staff_role` set, membership is role-based;
/// otherwise the permission heuristic in [`is_elevated`] applies.
#[instrument(skip(members), fields(member_count = members.len()))]
pub fn build_pool(members: &[MemberProfile], staff_role: Option<u64>) -> Vec<PoolEntry> {
    let mut entries: Vec<PoolEntry> = members
        .iter()
        .filter(|member| !member.is_bot)
        .filter(|member| match staff_role {
            Some(role_id) => member.role_ids.contains(&role_id),
            None => is_elevated(member.permissions),
        })
        .map(|member| PoolEntry {
            user_id: member.user_id,
            display_name: member.display_name.clone(),
        })
        .collect();

    entries.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then(a.user_id.cmp(&b.user_id))
    });
    entries.truncate(MAX_POOL_SIZE);
    entries
}

/// Permission heuristic for the unconfigured fallback pool.
pub fn is_elevated(permissions: Permissions) -> bool {
    permissions.contains(Permissions::ADMINISTRATOR)
        || permissions.contains(Permissions::KICK_MEMBERS)
        || permissions.contains(Permissions::MANAGE_MESSAGES)
        || permissions.contains(Permissions::MANAGE_ROLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: u64, name: &str) -> MemberProfile {
        MemberProfile {
            user_id,
            display_name: name.to_string(),
            is_bot: false,
            role_ids: Vec::new(),
            permissions: Permissions::empty(),
        }
    }

    #[test]
    fn test_role_based_pool_keeps_only_role_holders() {
        let mut alice = profile(1, "alice");
        alice.role_ids = vec![500];
        let bob = profile(2, "bob");

        let pool = build_pool(&[alice, bob], Some(500));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].user_id, 1);
    }

    #[test]
    fn test_fallback_pool_uses_permission_heuristic() {
        let mut mod_member = profile(1, "mod");
        mod_member.permissions = Permissions::KICK_MEMBERS;
        let plain = profile(2, "plain");

        let pool = build_pool(&[mod_member, plain], None);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].user_id, 1);
    }

    #[test]
    fn test_administrator_counts_as_elevated() {
        assert!(is_elevated(Permissions::ADMINISTRATOR));
        assert!(is_elevated(Permissions::MANAGE_MESSAGES));
        assert!(is_elevated(Permissions::MANAGE_ROLES));
        assert!(!is_elevated(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn test_bots_never_enter_the_pool() {
        let mut bot = profile(1, "bot");
        bot.is_bot = true;
        bot.role_ids = vec![500];
        bot.permissions = Permissions::ADMINISTRATOR;

        assert!(build_pool(&[bot.clone()], Some(500)).is_empty());
        assert!(build_pool(&[bot], None).is_empty());
    }

    #[test]
    fn test_pool_caps_at_menu_limit() {
        let members: Vec<MemberProfile> = (0..30)
            .map(|i| {
                let mut member = profile(i, &format!("member{i:02}"));
                member.role_ids = vec![500];
                member
            })
            .collect();

        let pool = build_pool(&members, Some(500));
        assert_eq!(pool.len(), MAX_POOL_SIZE);
        // Deterministic cut: sorted by name, lowest 25 survive.
        assert_eq!(pool[0].display_name, "member00");
        assert_eq!(pool[24].display_name, "member24");
    }

    #[test]
    fn test_pool_sorted_case_insensitively() {
        let mut zed = profile(1, "Zed");
        zed.role_ids = vec![500];
        let mut amy = profile(2, "amy");
        amy.role_ids = vec![500];
        let mut brim = profile(3, "Brim");
        brim.role_ids = vec![500];

        let pool = build_pool(&[zed, amy, brim], Some(500));
        let names: Vec<&str> = pool.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["amy", "Brim", "Zed"]);
    }
}
