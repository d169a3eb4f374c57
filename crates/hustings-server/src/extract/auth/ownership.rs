//! Resource-level checks for `own`/`any` scoped permissions.

use uuid::Uuid;

use super::{AuthState, Permission, RolePermissions};
use crate::handler::{ErrorKind, Result};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHORIZATION;

/// The `any`/`own` permission pair guarding one kind of resource action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipRule {
    /// Grants the action on every resource.
    pub any: Permission,
    /// Grants the action on resources the caller created.
    pub own: Permission,
}

impl OwnershipRule {
    pub const ARTICLE_UPDATE: Self = Self::new(Permission::BlogUpdateAny, Permission::BlogUpdateOwn);
    pub const ARTICLE_DELETE: Self = Self::new(Permission::BlogDeleteAny, Permission::BlogDeleteOwn);
    pub const COMMENT_DELETE: Self =
        Self::new(Permission::CommentDeleteAny, Permission::CommentDeleteOwn);
    pub const EVENT_UPDATE: Self = Self::new(Permission::EventUpdateAny, Permission::EventUpdateOwn);
    pub const EVENT_DELETE: Self = Self::new(Permission::EventDeleteAny, Permission::EventDeleteOwn);

    /// Creates a rule from its two permissions.
    pub const fn new(any: Permission, own: Permission) -> Self {
        Self { any, own }
    }

    /// Returns the pair as a route requirement, `any` first.
    pub fn permissions(self) -> [Permission; 2] {
        [self.any, self.own]
    }

    /// Returns whether a holder of `granted` may act on a resource owned by
    /// `owner_id` when the caller is `subject_id`.
    pub fn permits(
        self,
        matrix: &RolePermissions,
        auth_state: &AuthState,
        owner_id: Uuid,
    ) -> bool {
        let granted = matrix.permissions_of(auth_state.role);
        granted.contains(&self.any)
            || (granted.contains(&self.own) && owner_id == auth_state.subject_id)
    }
}

impl AuthState {
    /// Checks an `own`/`any` rule against a loaded resource.
    ///
    /// The route layer has already admitted the caller on either permission;
    /// this narrows `own` holders to resources they created.
    pub fn authorize_ownership(
        &self,
        rule: OwnershipRule,
        owner_id: Uuid,
        resource: &'static str,
    ) -> Result<()> {
        if rule.permits(RolePermissions::global(), self, owner_id) {
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            subject_id = %self.subject_id,
            role = %self.role,
            owner_id = %owner_id,
            permission = %rule.own,
            "ownership check failed"
        );

        Err(ErrorKind::Forbidden
            .with_message(format!("requires one of: {} or {}", rule.any, rule.own))
            .with_context("only the author may change this resource")
            .with_resource(resource))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hustings_postgres::types::{UserRole, UserStatus};

    use super::*;
    use crate::extract::{AuthClaims, Identity};

    fn auth_state(role: UserRole) -> AuthState {
        let identity = Identity {
            subject_id: Uuid::now_v7(),
            email: "author@example.org".to_owned(),
            role,
            status: UserStatus::Active,
        };
        let claims = AuthClaims::new(
            identity.subject_id,
            identity.email.clone(),
            role,
            Duration::from_secs(60),
        )
        .expect("claims");
        AuthState::new(claims, identity)
    }

    #[test]
    fn own_permission_needs_ownership() {
        let author = auth_state(UserRole::VerifiedMember);
        let rule = OwnershipRule::COMMENT_DELETE;

        assert!(author.authorize_ownership(rule, author.subject_id, "comment").is_ok());

        let error = author
            .authorize_ownership(rule, Uuid::now_v7(), "comment")
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn any_permission_ignores_ownership() {
        let moderator = auth_state(UserRole::Moderator);
        assert!(
            moderator
                .authorize_ownership(OwnershipRule::COMMENT_DELETE, Uuid::now_v7(), "comment")
                .is_ok()
        );
    }

    #[test]
    fn domain_admins_stay_in_their_domain() {
        let blog_admin = auth_state(UserRole::BlogAdmin);
        let own_event = blog_admin.authorize_ownership(
            OwnershipRule::EVENT_UPDATE,
            blog_admin.subject_id,
            "event",
        );
        assert!(own_event.is_err());
    }

    #[test]
    fn rule_permissions_lead_with_any() {
        assert_eq!(
            OwnershipRule::ARTICLE_DELETE.permissions(),
            [Permission::BlogDeleteAny, Permission::BlogDeleteOwn]
        );
    }
}
