//! Authentication and role-based authorization.
//!
//! Authentication turns a bearer token into an [`AuthState`]: the verified
//! [`AuthClaims`] plus the account's current [`Identity`]. Authorization then
//! asks the [`RolePermissions`] matrix whether that identity's role holds a
//! [`Permission`] the route requires, see [`authorize`].

mod auth_decision;
mod auth_state;
pub(crate) mod identity;
mod jwt_header;
mod ownership;
mod permission;
mod role_permissions;

pub use self::auth_decision::{AuthDecision, Denial, authorize};
pub use self::auth_state::AuthState;
pub use self::identity::{Identity, IdentityResolver, IdentityStore};
pub use self::jwt_header::{AuthClaims, AuthHeader};
pub use self::ownership::OwnershipRule;
pub use self::permission::Permission;
pub use self::role_permissions::RolePermissions;
