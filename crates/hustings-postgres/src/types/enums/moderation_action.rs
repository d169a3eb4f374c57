//! Moderation action enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::UserStatus;

/// Action recorded in the moderation log.
///
/// Corresponds to the `MODERATION_ACTION` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ModerationAction"]
#[strum(serialize_all = "snake_case")]
pub enum ModerationAction {
    #[db_rename = "ban"]
    #[serde(rename = "ban")]
    Ban,

    #[db_rename = "suspend"]
    #[serde(rename = "suspend")]
    Suspend,

    #[db_rename = "reinstate"]
    #[serde(rename = "reinstate")]
    Reinstate,
}

impl ModerationAction {
    /// Returns the status a user ends up in after this action.
    #[inline]
    pub fn resulting_status(self) -> UserStatus {
        match self {
            ModerationAction::Ban => UserStatus::Banned,
            ModerationAction::Suspend => UserStatus::Suspended,
            ModerationAction::Reinstate => UserStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resulting_status() {
        assert_eq!(ModerationAction::Ban.resulting_status(), UserStatus::Banned);
        assert_eq!(
            ModerationAction::Suspend.resulting_status(),
            UserStatus::Suspended
        );
        assert_eq!(
            ModerationAction::Reinstate.resulting_status(),
            UserStatus::Active
        );
    }
}
