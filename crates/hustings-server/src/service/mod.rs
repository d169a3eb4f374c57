//! Application state, configuration and the services handlers depend on.

mod config;
mod feature_flags;
pub(crate) mod security;
mod state;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::feature_flags::{FeatureFlag, FeatureFlags};
pub use crate::service::security::{
    PasswordHasher, SessionKeys, SessionKeysConfig, VerificationNotifier, VerificationToken,
};
pub use crate::service::state::ServiceState;
pub use crate::{Error, Result};
