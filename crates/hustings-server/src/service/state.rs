//! Application state and dependency injection.

use hustings_postgres::PgClient;

use crate::Result;
use crate::extract::{IdentityResolver, IdentityStore};
use crate::service::{
    FeatureFlags, PasswordHasher, ServiceConfig, SessionKeys, VerificationNotifier,
};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    identity_resolver: IdentityResolver,

    password_hasher: PasswordHasher,
    session_keys: SessionKeys,
    feature_flags: FeatureFlags,
    verification_notifier: VerificationNotifier,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to Postgres, applies migrations and loads the session keys.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let pg_client = config.connect_postgres().await?;
        let session_keys = config.load_session_keys().await?;
        Ok(Self::new(pg_client, session_keys, config.feature_flags.clone()))
    }

    /// Assembles state from already initialized parts.
    ///
    /// Identities are resolved through `pg_client`.
    pub fn new(pg_client: PgClient, session_keys: SessionKeys, feature_flags: FeatureFlags) -> Self {
        Self {
            identity_resolver: IdentityResolver::new(pg_client.clone()),
            pg_client,

            password_hasher: PasswordHasher::new(),
            session_keys,
            feature_flags,
            verification_notifier: VerificationNotifier::new(),
        }
    }

    /// Replaces the store used to resolve request identities.
    pub fn with_identity_store(mut self, store: impl IdentityStore + 'static) -> Self {
        self.identity_resolver = IdentityResolver::new(store);
        self
    }

    /// Returns the enabled features.
    #[inline]
    pub fn feature_flags(&self) -> &FeatureFlags {
        &self.feature_flags
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(identity_resolver: IdentityResolver);

impl_di!(password_hasher: PasswordHasher);
impl_di!(session_keys: SessionKeys);
impl_di!(feature_flags: FeatureFlags);
impl_di!(verification_notifier: VerificationNotifier);
