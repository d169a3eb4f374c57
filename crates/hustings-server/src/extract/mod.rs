//! Request extractors.
//!
//! Everything here rejects with [`handler::Error`], so a failed extraction
//! produces the same JSON error body as a failed handler.
//!
//! [`handler::Error`]: crate::handler::Error

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{
    AuthClaims, AuthDecision, AuthHeader, AuthState, Denial, Identity, IdentityResolver,
    IdentityStore, OwnershipRule, Permission, RolePermissions, authorize,
};
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
