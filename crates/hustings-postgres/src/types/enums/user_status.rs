//! Account status enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle status of a user account.
///
/// Corresponds to the `USER_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserStatus"]
#[strum(serialize_all = "snake_case")]
pub enum UserStatus {
    /// Email confirmed and in good standing.
    #[db_rename = "active"]
    #[serde(rename = "active")]
    Active,

    /// Permanently removed from the platform by a moderator.
    #[db_rename = "banned"]
    #[serde(rename = "banned")]
    Banned,

    /// Temporarily removed from the platform by a moderator.
    #[db_rename = "suspended"]
    #[serde(rename = "suspended")]
    Suspended,

    /// Registered but email not yet confirmed.
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,
}

impl UserStatus {
    /// Returns whether a user in this status may authenticate.
    ///
    /// Pending users can sign in; banned and suspended users cannot.
    #[inline]
    pub fn can_authenticate(self) -> bool {
        matches!(self, UserStatus::Active | UserStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_by_status() {
        assert!(UserStatus::Active.can_authenticate());
        assert!(UserStatus::Pending.can_authenticate());
        assert!(!UserStatus::Banned.can_authenticate());
        assert!(!UserStatus::Suspended.can_authenticate());
    }
}
