//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - [`PolicyRouter`] records a [`RoutePolicy`] for every route and
//!   [`RouterAuthorizationExt`] enforces it.
//! - [`RouterRecoveryExt`] turns timeouts and panics into JSON errors.
//! - [`RouterObservabilityExt`] adds request ids and trace spans.

mod authorization;
mod observability;
mod recovery;
mod route_policy;

pub use authorization::{AuthorizationState, RouterAuthorizationExt, enforce_route_policy};
pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use route_policy::{PolicyRouter, RoutePolicy, RouteRegistry};
