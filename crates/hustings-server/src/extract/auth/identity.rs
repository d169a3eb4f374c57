//! Resolves the current state of the account behind a token.

use std::sync::Arc;

use async_trait::async_trait;
use hustings_postgres::PgClient;
use hustings_postgres::model::User;
use hustings_postgres::query::UserRepository;
use hustings_postgres::types::{UserRole, UserStatus};
use serde::Serialize;
use uuid::Uuid;

use super::AuthClaims;
use crate::handler::{ErrorKind, Result};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// The account behind an authenticated request, as currently stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Account id, equal to the token subject.
    pub subject_id: Uuid,
    /// Current email address.
    pub email: String,
    /// Current role.
    pub role: UserRole,
    /// Current status.
    pub status: UserStatus,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            subject_id: user.id,
            email: user.email,
            role: user.role,
            status: user.status,
        }
    }
}

/// Read access to account identities.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Looks up an account by id.
    async fn find_identity(&self, subject_id: Uuid) -> crate::Result<Option<Identity>>;
}

#[async_trait]
impl IdentityStore for PgClient {
    async fn find_identity(&self, subject_id: Uuid) -> crate::Result<Option<Identity>> {
        let mut conn = self.get_connection().await?;
        let user = conn.find_user_by_id(subject_id).await?;
        Ok(user.map(Identity::from))
    }
}

/// Turns verified claims into the current [`Identity`].
///
/// Rejects tokens whose account no longer exists or may not sign in.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    /// Creates a resolver backed by the given store.
    pub fn new(store: impl IdentityStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Re-reads the account named by `claims`.
    pub async fn resolve(&self, claims: &AuthClaims) -> Result<Identity> {
        let identity = self
            .store
            .find_identity(claims.subject_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %e,
                    subject_id = %claims.subject_id,
                    "identity lookup failed"
                );
                ErrorKind::ServiceUnavailable
                    .with_message("Authentication verification is temporarily unavailable")
            })?
            .ok_or_else(|| {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    subject_id = %claims.subject_id,
                    token_id = %claims.token_id,
                    "token subject no longer exists"
                );
                ErrorKind::Unauthorized
                    .with_message("Account not found")
                    .with_resource("authentication")
            })?;

        if !identity.status.can_authenticate() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                subject_id = %identity.subject_id,
                status = %identity.status,
                "token subject may not sign in"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Account is not allowed to sign in")
                .with_context(format!("account status: {}", identity.status))
                .with_resource("authentication"));
        }

        Ok(identity)
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::RwLock;
    use std::time::Duration;

    use super::*;

    /// Identity store kept in memory, for tests that never reach Postgres.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct MemoryIdentityStore {
        identities: Arc<RwLock<HashMap<Uuid, Identity>>>,
    }

    impl MemoryIdentityStore {
        pub(crate) fn insert(&self, role: UserRole, status: UserStatus) -> Identity {
            let subject_id = Uuid::now_v7();
            let identity = Identity {
                subject_id,
                email: format!("{subject_id}@example.org"),
                role,
                status,
            };

            self.identities
                .write()
                .expect("identity store lock")
                .insert(subject_id, identity.clone());
            identity
        }

        pub(crate) fn set_role(&self, subject_id: Uuid, role: UserRole) {
            let mut identities = self.identities.write().expect("identity store lock");
            if let Some(identity) = identities.get_mut(&subject_id) {
                identity.role = role;
            }
        }
    }

    #[async_trait]
    impl IdentityStore for MemoryIdentityStore {
        async fn find_identity(&self, subject_id: Uuid) -> crate::Result<Option<Identity>> {
            let identities = self.identities.read().expect("identity store lock");
            Ok(identities.get(&subject_id).cloned())
        }
    }

    fn claims_for(identity: &Identity) -> AuthClaims {
        AuthClaims::new(
            identity.subject_id,
            identity.email.clone(),
            identity.role,
            Duration::from_secs(60),
        )
        .expect("claims")
    }

    #[tokio::test]
    async fn resolves_current_role() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::default();
        let identity = store.insert(UserRole::Moderator, UserStatus::Active);
        let mut claims = claims_for(&identity);
        claims.role = UserRole::SuperAdmin;

        let resolved = IdentityResolver::new(store).resolve(&claims).await?;
        assert_eq!(resolved.role, UserRole::Moderator);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_missing_subject() {
        let store = MemoryIdentityStore::default();
        let ghost = Identity {
            subject_id: Uuid::now_v7(),
            email: "ghost@example.org".to_owned(),
            role: UserRole::Member,
            status: UserStatus::Active,
        };

        let error = IdentityResolver::new(store)
            .resolve(&claims_for(&ghost))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn rejects_banned_and_suspended() {
        let store = MemoryIdentityStore::default();
        let resolver = IdentityResolver::new(store.clone());

        for status in [UserStatus::Banned, UserStatus::Suspended] {
            let identity = store.insert(UserRole::Member, status);
            let error = resolver.resolve(&claims_for(&identity)).await.unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Unauthorized);
        }
    }

    #[tokio::test]
    async fn pending_accounts_resolve() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::default();
        let identity = store.insert(UserRole::Member, UserStatus::Pending);

        let resolved = IdentityResolver::new(store)
            .resolve(&claims_for(&identity))
            .await?;
        assert_eq!(resolved.status, UserStatus::Pending);
        Ok(())
    }
}
