//! The closed catalog of capability tokens.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// A fine-grained capability token, namespaced as `resource:action[:scope]`.
///
/// The catalog is closed: tokens are added by code change only. Routes can
/// reference nothing outside this enum, so an unknown token is a compile
/// error rather than a runtime one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Display, EnumIter, EnumString, EnumCount, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Permission {
    // Blog
    #[strum(serialize = "blog:read")]
    BlogRead,
    #[strum(serialize = "blog:create")]
    BlogCreate,
    #[strum(serialize = "blog:update:own")]
    BlogUpdateOwn,
    #[strum(serialize = "blog:update:any")]
    BlogUpdateAny,
    #[strum(serialize = "blog:delete:own")]
    BlogDeleteOwn,
    #[strum(serialize = "blog:delete:any")]
    BlogDeleteAny,
    #[strum(serialize = "blog:publish")]
    BlogPublish,

    // Comments
    #[strum(serialize = "comment:read")]
    CommentRead,
    #[strum(serialize = "comment:create")]
    CommentCreate,
    #[strum(serialize = "comment:delete:own")]
    CommentDeleteOwn,
    #[strum(serialize = "comment:delete:any")]
    CommentDeleteAny,

    // Events
    #[strum(serialize = "event:read")]
    EventRead,
    #[strum(serialize = "event:create")]
    EventCreate,
    #[strum(serialize = "event:update:own")]
    EventUpdateOwn,
    #[strum(serialize = "event:update:any")]
    EventUpdateAny,
    #[strum(serialize = "event:delete:own")]
    EventDeleteOwn,
    #[strum(serialize = "event:delete:any")]
    EventDeleteAny,
    #[strum(serialize = "event:publish")]
    EventPublish,
    #[strum(serialize = "event:register")]
    EventRegister,
    #[strum(serialize = "event:attendees:read")]
    EventAttendeesRead,

    // Users
    #[strum(serialize = "user:read")]
    UserRead,
    #[strum(serialize = "user:ban")]
    UserBan,
    #[strum(serialize = "user:suspend")]
    UserSuspend,
    #[strum(serialize = "user:role:assign")]
    UserRoleAssign,

    // Moderation
    #[strum(serialize = "moderation:log:read")]
    ModerationLogRead,

    // System
    #[strum(serialize = "system:feature_flags")]
    SystemFeatureFlags,
}

impl Permission {
    /// Returns the token string, e.g. `blog:update:own`.
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns the resource namespace, e.g. `blog` for `blog:update:own`.
    pub fn resource(self) -> &'static str {
        let token = self.as_str();
        token.split(':').next().unwrap_or(token)
    }

    /// Returns whether the token is limited to resources the subject owns.
    #[inline]
    pub fn is_own_scoped(self) -> bool {
        self.as_str().ends_with(":own")
    }

    /// Returns whether the token applies to resources of any owner.
    #[inline]
    pub fn is_any_scoped(self) -> bool {
        self.as_str().ends_with(":any")
    }
}

impl TryFrom<String> for Permission {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Joins tokens the way denial messages present them: `a or b or c`.
pub(crate) fn join_or(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" or ")
}
