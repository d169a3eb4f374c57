//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g. `RUST_LOG=hustings_server::authorization=debug`.

/// Token validation and identity resolution.
pub const TRACING_TARGET_AUTHENTICATION: &str = "hustings_server::authentication";

/// Route policy resolution and permission decisions.
pub const TRACING_TARGET_AUTHORIZATION: &str = "hustings_server::authorization";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "hustings_server::recovery::error";

/// Panic recovery including handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "hustings_server::recovery::panic";

/// Password hashing and verification operations.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "hustings_server::password_hasher";

/// Session key management and JWT signing operations.
pub const TRACING_TARGET_SESSION_KEYS: &str = "hustings_server::session_keys";

/// Outbound notifications such as email verification.
pub const TRACING_TARGET_NOTIFIER: &str = "hustings_server::notifier";

/// Plain verification tokens, emitted by debug builds only.
#[cfg(debug_assertions)]
pub const TRACING_TARGET_NOTIFIER_DEV: &str = "hustings_server::notifier::dev";

/// Moderation actions against users.
pub const TRACING_TARGET_MODERATION: &str = "hustings_server::moderation";
