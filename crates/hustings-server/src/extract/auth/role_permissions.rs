//! Static role to permission matrix.
//!
//! Every role's set is spelled out in full rather than derived from another
//! role, so a single glance at one entry shows everything that role can do.
//! When adding a token to the catalog, update every role that should hold it.
//! The super admin entry is the whole catalog and needs no update.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use hustings_postgres::types::UserRole;
use strum::IntoEnumIterator;

use super::Permission;
use super::Permission::*;

const MEMBER: &[Permission] = &[BlogRead, CommentRead, EventRead];

const VERIFIED_MEMBER: &[Permission] = &[
    BlogRead,
    CommentRead,
    EventRead,
    CommentCreate,
    CommentDeleteOwn,
    EventRegister,
];

const MODERATOR: &[Permission] = &[
    BlogRead,
    CommentRead,
    EventRead,
    CommentCreate,
    CommentDeleteOwn,
    EventRegister,
    CommentDeleteAny,
    UserRead,
    UserBan,
    UserSuspend,
    ModerationLogRead,
];

const BLOG_ADMIN: &[Permission] = &[
    BlogRead,
    CommentRead,
    EventRead,
    CommentCreate,
    CommentDeleteOwn,
    EventRegister,
    BlogCreate,
    BlogUpdateOwn,
    BlogUpdateAny,
    BlogDeleteOwn,
    BlogDeleteAny,
    BlogPublish,
    CommentDeleteAny,
];

const EVENT_ADMIN: &[Permission] = &[
    BlogRead,
    CommentRead,
    EventRead,
    CommentCreate,
    CommentDeleteOwn,
    EventRegister,
    EventCreate,
    EventUpdateOwn,
    EventUpdateAny,
    EventDeleteOwn,
    EventDeleteAny,
    EventPublish,
    EventAttendeesRead,
];

const ADMIN: &[Permission] = &[
    BlogRead,
    CommentRead,
    EventRead,
    CommentCreate,
    CommentDeleteOwn,
    CommentDeleteAny,
    EventRegister,
    BlogCreate,
    BlogUpdateOwn,
    BlogUpdateAny,
    BlogDeleteOwn,
    BlogDeleteAny,
    BlogPublish,
    EventCreate,
    EventUpdateOwn,
    EventUpdateAny,
    EventDeleteOwn,
    EventDeleteAny,
    EventPublish,
    EventAttendeesRead,
    UserRead,
    UserBan,
    UserSuspend,
    UserRoleAssign,
    ModerationLogRead,
];

static GLOBAL: LazyLock<RolePermissions> = LazyLock::new(RolePermissions::new);

/// Immutable mapping from each [`UserRole`] to the permissions it holds.
#[derive(Debug, Clone)]
pub struct RolePermissions {
    matrix: HashMap<UserRole, HashSet<Permission>>,
    empty: HashSet<Permission>,
}

impl RolePermissions {
    /// Builds the matrix for every role.
    pub fn new() -> Self {
        let matrix = UserRole::iter()
            .map(|role| {
                let permissions = match role {
                    UserRole::Member => MEMBER.iter().copied().collect(),
                    UserRole::VerifiedMember => VERIFIED_MEMBER.iter().copied().collect(),
                    UserRole::Moderator => MODERATOR.iter().copied().collect(),
                    UserRole::BlogAdmin => BLOG_ADMIN.iter().copied().collect(),
                    UserRole::EventAdmin => EVENT_ADMIN.iter().copied().collect(),
                    UserRole::Admin => ADMIN.iter().copied().collect(),
                    UserRole::SuperAdmin => Permission::iter().collect(),
                };
                (role, permissions)
            })
            .collect();

        Self {
            matrix,
            empty: HashSet::new(),
        }
    }

    /// Builds a matrix from explicit entries. Roles left out hold nothing.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (UserRole, HashSet<Permission>)>,
    ) -> Self {
        Self {
            matrix: entries.into_iter().collect(),
            empty: HashSet::new(),
        }
    }

    /// Returns the process-wide matrix, built on first use.
    #[inline]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the permissions of a role, or an empty set if it has no entry.
    #[inline]
    pub fn permissions_of(&self, role: UserRole) -> &HashSet<Permission> {
        self.matrix.get(&role).unwrap_or(&self.empty)
    }

    /// Returns whether the role holds the permission.
    #[inline]
    pub fn role_has(&self, role: UserRole, permission: Permission) -> bool {
        self.permissions_of(role).contains(&permission)
    }

    /// Returns the entry for a role, distinguishing a missing entry from an
    /// empty one.
    #[inline]
    pub fn get(&self, role: UserRole) -> Option<&HashSet<Permission>> {
        self.matrix.get(&role)
    }
}

impl Default for RolePermissions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::EnumCount;

    use super::*;

    const MEMBER_TOKENS: &[&str] = &["blog:read", "comment:read", "event:read"];

    const VERIFIED_MEMBER_TOKENS: &[&str] = &[
        "blog:read",
        "comment:read",
        "event:read",
        "comment:create",
        "comment:delete:own",
        "event:register",
    ];

    const MODERATOR_TOKENS: &[&str] = &[
        "blog:read",
        "comment:read",
        "event:read",
        "comment:create",
        "comment:delete:own",
        "event:register",
        "comment:delete:any",
        "user:read",
        "user:ban",
        "user:suspend",
        "moderation:log:read",
    ];

    const BLOG_ADMIN_TOKENS: &[&str] = &[
        "blog:read",
        "comment:read",
        "event:read",
        "comment:create",
        "comment:delete:own",
        "event:register",
        "blog:create",
        "blog:update:own",
        "blog:update:any",
        "blog:delete:own",
        "blog:delete:any",
        "blog:publish",
        "comment:delete:any",
    ];

    const EVENT_ADMIN_TOKENS: &[&str] = &[
        "blog:read",
        "comment:read",
        "event:read",
        "comment:create",
        "comment:delete:own",
        "event:register",
        "event:create",
        "event:update:own",
        "event:update:any",
        "event:delete:own",
        "event:delete:any",
        "event:publish",
        "event:attendees:read",
    ];

    const ADMIN_TOKENS: &[&str] = &[
        "blog:read",
        "comment:read",
        "event:read",
        "comment:create",
        "comment:delete:own",
        "comment:delete:any",
        "event:register",
        "blog:create",
        "blog:update:own",
        "blog:update:any",
        "blog:delete:own",
        "blog:delete:any",
        "blog:publish",
        "event:create",
        "event:update:own",
        "event:update:any",
        "event:delete:own",
        "event:delete:any",
        "event:publish",
        "event:attendees:read",
        "user:read",
        "user:ban",
        "user:suspend",
        "user:role:assign",
        "moderation:log:read",
    ];

    const SUPER_ADMIN_TOKENS: &[&str] = &[
        "blog:read",
        "blog:create",
        "blog:update:own",
        "blog:update:any",
        "blog:delete:own",
        "blog:delete:any",
        "blog:publish",
        "comment:read",
        "comment:create",
        "comment:delete:own",
        "comment:delete:any",
        "event:read",
        "event:create",
        "event:update:own",
        "event:update:any",
        "event:delete:own",
        "event:delete:any",
        "event:publish",
        "event:register",
        "event:attendees:read",
        "user:read",
        "user:ban",
        "user:suspend",
        "user:role:assign",
        "moderation:log:read",
        "system:feature_flags",
    ];

    fn expected(role: UserRole) -> anyhow::Result<HashSet<Permission>> {
        let tokens = match role {
            UserRole::Member => MEMBER_TOKENS,
            UserRole::VerifiedMember => VERIFIED_MEMBER_TOKENS,
            UserRole::Moderator => MODERATOR_TOKENS,
            UserRole::BlogAdmin => BLOG_ADMIN_TOKENS,
            UserRole::EventAdmin => EVENT_ADMIN_TOKENS,
            UserRole::Admin => ADMIN_TOKENS,
            UserRole::SuperAdmin => SUPER_ADMIN_TOKENS,
        };

        let mut set = HashSet::new();
        for token in tokens {
            set.insert(Permission::from_str(token)?);
        }
        Ok(set)
    }

    #[test]
    fn every_role_holds_exactly_its_listed_tokens() -> anyhow::Result<()> {
        let matrix = RolePermissions::global();
        for role in UserRole::iter() {
            assert_eq!(matrix.permissions_of(role), &expected(role)?, "{role}");
        }
        Ok(())
    }

    #[test]
    fn role_has_agrees_with_listed_tokens() -> anyhow::Result<()> {
        let matrix = RolePermissions::global();
        for role in UserRole::iter() {
            let expected = expected(role)?;
            for permission in Permission::iter() {
                assert_eq!(
                    matrix.role_has(role, permission),
                    expected.contains(&permission),
                    "{role} / {permission}"
                );
            }
        }
        Ok(())
    }

    #[test]
    fn every_role_has_a_non_empty_entry() {
        let matrix = RolePermissions::global();
        for role in UserRole::iter() {
            assert!(matrix.get(role).is_some_and(|set| !set.is_empty()), "{role}");
        }
    }

    #[test]
    fn super_admin_holds_the_full_catalog() {
        let matrix = RolePermissions::global();
        assert_eq!(
            matrix.permissions_of(UserRole::SuperAdmin).len(),
            Permission::COUNT
        );
    }

    #[test]
    fn member_is_read_only() {
        let matrix = RolePermissions::global();
        let member = matrix.permissions_of(UserRole::Member);
        assert_eq!(member.len(), 3);
        assert!(member.iter().all(|p| p.as_str().ends_with(":read")));
    }

    #[test]
    fn domain_admins_are_disjoint_on_management_tokens() {
        let matrix = RolePermissions::global();
        let blog_admin = matrix.permissions_of(UserRole::BlogAdmin);
        let event_admin = matrix.permissions_of(UserRole::EventAdmin);

        let blog_management = [
            BlogCreate,
            BlogUpdateOwn,
            BlogUpdateAny,
            BlogDeleteOwn,
            BlogDeleteAny,
            BlogPublish,
        ];
        let event_management = [
            EventCreate,
            EventUpdateOwn,
            EventUpdateAny,
            EventDeleteOwn,
            EventDeleteAny,
            EventPublish,
            EventAttendeesRead,
        ];

        assert!(blog_management.iter().all(|p| !event_admin.contains(p)));
        assert!(event_management.iter().all(|p| !blog_admin.contains(p)));
        assert!(blog_management.iter().all(|p| blog_admin.contains(p)));
        assert!(event_management.iter().all(|p| event_admin.contains(p)));
    }

    #[test]
    fn staff_roles_extend_verified_member() {
        let matrix = RolePermissions::global();
        let verified = matrix.permissions_of(UserRole::VerifiedMember);
        for role in [
            UserRole::Moderator,
            UserRole::BlogAdmin,
            UserRole::EventAdmin,
            UserRole::Admin,
        ] {
            assert!(verified.is_subset(matrix.permissions_of(role)), "{role}");
        }
    }

    #[test]
    fn admin_is_union_of_staff_plus_role_assignment() {
        let matrix = RolePermissions::global();
        let mut expected: HashSet<Permission> = [
            UserRole::Moderator,
            UserRole::BlogAdmin,
            UserRole::EventAdmin,
        ]
        .into_iter()
        .flat_map(|role| matrix.permissions_of(role).iter().copied())
        .collect();
        expected.insert(UserRoleAssign);

        assert_eq!(matrix.permissions_of(UserRole::Admin), &expected);
        assert!(!matrix.role_has(UserRole::Admin, SystemFeatureFlags));
    }

    #[test]
    fn missing_entries_are_empty() {
        let matrix = RolePermissions::from_entries([(UserRole::Member, HashSet::from([BlogRead]))]);
        assert!(matrix.get(UserRole::Moderator).is_none());
        assert!(matrix.permissions_of(UserRole::Moderator).is_empty());
        assert!(!matrix.role_has(UserRole::Moderator, BlogRead));
        assert!(matrix.role_has(UserRole::Member, BlogRead));
    }
}
