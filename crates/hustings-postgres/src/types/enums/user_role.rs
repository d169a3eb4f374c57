//! Platform role enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The single role held by every user.
///
/// Corresponds to the `USER_ROLE` PostgreSQL enum. Roles carry no implicit
/// ordering for authorization purposes: what a role may do is decided solely
/// by the explicit role to permission matrix in the server crate.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
    /// Freshly registered supporter with read-only access.
    #[db_rename = "member"]
    #[serde(rename = "member")]
    #[default]
    Member,

    /// Member whose email address has been confirmed.
    #[db_rename = "verified_member"]
    #[serde(rename = "verified_member")]
    VerifiedMember,

    /// Community moderator for comments and user conduct.
    #[db_rename = "moderator"]
    #[serde(rename = "moderator")]
    Moderator,

    /// Manages blog articles.
    #[db_rename = "blog_admin"]
    #[serde(rename = "blog_admin")]
    BlogAdmin,

    /// Manages campaign events and attendee lists.
    #[db_rename = "event_admin"]
    #[serde(rename = "event_admin")]
    EventAdmin,

    /// Campaign staff administrator.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    Admin,

    /// Unrestricted platform operator.
    #[db_rename = "super_admin"]
    #[serde(rename = "super_admin")]
    SuperAdmin,
}

impl UserRole {
    /// Returns whether this role belongs to campaign staff (admins of any kind).
    #[inline]
    pub fn is_staff(self) -> bool {
        matches!(
            self,
            UserRole::BlogAdmin | UserRole::EventAdmin | UserRole::Admin | UserRole::SuperAdmin
        )
    }

    /// Returns whether only a super admin may grant or act against this role.
    #[inline]
    pub fn is_privileged(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}
