//! The allow/deny decision for a single request.

use hustings_postgres::types::UserRole;

use super::permission::join_or;
use super::{Permission, RolePermissions};
use crate::handler::{Error, ErrorKind};
use crate::middleware::RoutePolicy;

/// Outcome of [`authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// The request may proceed.
    Allow,
    /// The request is rejected for the given reason.
    Deny(Denial),
}

impl AuthDecision {
    /// Returns whether the decision allows the request.
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the decision into a result, turning denials into errors.
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(denial) => Err(denial),
        }
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// No valid identity accompanied the request.
    #[error("authentication required")]
    Unauthenticated,
    /// The identity's role has no entry in the matrix.
    #[error("invalid role: {0}")]
    InvalidRole(UserRole),
    /// The role holds none of the listed permissions.
    #[error("requires one of: {}", join_or(.0))]
    InsufficientPermissions(Vec<Permission>),
}

/// Decides whether a subject with `role` may pass `policy`.
///
/// `role` is `None` for anonymous requests. Steps run in order and the first
/// conclusive one wins:
///
/// 1. public routes allow everyone;
/// 2. routes without permissions only need an identity;
/// 3. anything else needs an identity;
/// 4. whose role the matrix knows;
/// 5. and which holds at least one of the listed permissions.
pub fn authorize(
    matrix: &RolePermissions,
    policy: &RoutePolicy,
    role: Option<UserRole>,
) -> AuthDecision {
    if policy.public {
        return AuthDecision::Allow;
    }

    let Some(role) = role else {
        return AuthDecision::Deny(Denial::Unauthenticated);
    };

    if policy.permissions.is_empty() {
        return AuthDecision::Allow;
    }

    let Some(granted) = matrix.get(role) else {
        return AuthDecision::Deny(Denial::InvalidRole(role));
    };

    if policy.permissions.iter().any(|p| granted.contains(p)) {
        AuthDecision::Allow
    } else {
        AuthDecision::Deny(Denial::InsufficientPermissions(policy.permissions.clone()))
    }
}

impl From<Denial> for Error<'static> {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => ErrorKind::MissingAuthToken
                .with_message("Authentication required")
                .with_resource("authentication"),
            Denial::InvalidRole(role) => ErrorKind::Forbidden
                .with_message("Your account role is not recognized")
                .with_context(format!("role: {role}"))
                .with_resource("authorization"),
            denial @ Denial::InsufficientPermissions(_) => ErrorKind::Forbidden
                .with_message(denial.to_string())
                .with_resource("authorization"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    fn matrix() -> &'static RolePermissions {
        RolePermissions::global()
    }

    #[test]
    fn scenario_a_member_cannot_create_articles() {
        let policy = RoutePolicy::require([Permission::BlogCreate]);
        let decision = authorize(matrix(), &policy, Some(UserRole::Member));

        let AuthDecision::Deny(denial) = decision else {
            panic!("member must be denied");
        };
        assert_eq!(
            denial,
            Denial::InsufficientPermissions(vec![Permission::BlogCreate])
        );
        assert!(denial.to_string().contains("blog:create"));
    }

    #[test]
    fn scenario_b_moderator_can_ban() {
        let policy = RoutePolicy::require([Permission::UserBan]);
        let decision = authorize(matrix(), &policy, Some(UserRole::Moderator));
        assert_eq!(decision, AuthDecision::Allow);
    }

    #[test]
    fn scenario_c_public_short_circuits() {
        let mut policy = RoutePolicy::require([Permission::BlogCreate]);
        policy.public = true;
        assert_eq!(authorize(matrix(), &policy, None), AuthDecision::Allow);
    }

    #[test]
    fn scenario_d_authenticated_route_without_identity() {
        let policy = RoutePolicy::authenticated();
        assert_eq!(
            authorize(matrix(), &policy, None),
            AuthDecision::Deny(Denial::Unauthenticated)
        );
    }

    #[test]
    fn scenario_e_super_admin_passes_every_token() {
        for permission in Permission::iter() {
            let policy = RoutePolicy::require([permission]);
            let decision = authorize(matrix(), &policy, Some(UserRole::SuperAdmin));
            assert!(decision.is_allowed(), "{permission}");
        }
    }

    #[test]
    fn scenario_f_permissions_are_or_combined() {
        let policy = RoutePolicy::require([Permission::BlogCreate, Permission::EventCreate]);
        let decision = authorize(matrix(), &policy, Some(UserRole::BlogAdmin));
        assert_eq!(decision, AuthDecision::Allow);
    }

    #[test]
    fn authenticated_route_allows_any_role() {
        let policy = RoutePolicy::authenticated();
        for role in UserRole::iter() {
            assert!(authorize(matrix(), &policy, Some(role)).is_allowed());
        }
    }

    #[test]
    fn missing_permissions_deny_with_identity_required() {
        let policy = RoutePolicy::require([Permission::UserBan]);
        assert_eq!(
            authorize(matrix(), &policy, None),
            AuthDecision::Deny(Denial::Unauthenticated)
        );
    }

    #[test]
    fn unknown_role_is_invalid_not_insufficient() {
        let matrix =
            RolePermissions::from_entries([(UserRole::Member, HashSet::from([Permission::BlogRead]))]);
        let policy = RoutePolicy::require([Permission::BlogRead]);

        assert_eq!(
            authorize(&matrix, &policy, Some(UserRole::Moderator)),
            AuthDecision::Deny(Denial::InvalidRole(UserRole::Moderator))
        );
    }

    #[test]
    fn denial_message_lists_alternatives() {
        let denial = Denial::InsufficientPermissions(vec![
            Permission::BlogCreate,
            Permission::EventCreate,
        ]);
        assert_eq!(
            denial.to_string(),
            "requires one of: blog:create or event:create"
        );
    }

    #[test]
    fn decision_is_pure() {
        let policy = RoutePolicy::require([Permission::CommentDeleteAny]);
        for role in UserRole::iter() {
            let first = authorize(matrix(), &policy, Some(role));
            let second = authorize(matrix(), &policy, Some(role));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn denials_map_to_status_codes() {
        use axum::http::StatusCode;

        let unauthenticated: Error = Denial::Unauthenticated.into();
        let invalid: Error = Denial::InvalidRole(UserRole::Admin).into();
        let insufficient: Error =
            Denial::InsufficientPermissions(vec![Permission::UserBan]).into();

        assert_eq!(
            unauthenticated.kind().status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(invalid.kind().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(insufficient.kind().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(insufficient.message(), Some("requires one of: user:ban"));
    }
}
