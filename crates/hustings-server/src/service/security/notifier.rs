//! Hand-off point for verification tokens.

use uuid::Uuid;

use super::VerificationToken;
use crate::utility::tracing_targets::TRACING_TARGET_NOTIFIER as TRACING_TARGET;
#[cfg(debug_assertions)]
use crate::utility::tracing_targets::TRACING_TARGET_NOTIFIER_DEV;

/// Delivers verification tokens to account holders.
///
/// Mail delivery lives outside this service. The notifier records the
/// hand-off by digest fingerprint; release builds never log a usable token.
#[derive(Debug, Clone, Default)]
pub struct VerificationNotifier;

impl VerificationNotifier {
    /// Creates a notifier.
    pub fn new() -> Self {
        Self
    }

    /// Hands a verification token over for delivery to `email`.
    ///
    /// Debug builds also emit the plain token on a separate target so local
    /// setups can confirm accounts without a mailer.
    pub fn send_verification(&self, user_id: Uuid, email: &str, token: &VerificationToken) {
        tracing::info!(
            target: TRACING_TARGET,
            user_id = %user_id,
            email = %email,
            token_fingerprint = token.fingerprint(),
            expires_at = %token.expires_at(),
            "verification token issued"
        );

        #[cfg(debug_assertions)]
        tracing::debug!(
            target: TRACING_TARGET_NOTIFIER_DEV,
            user_id = %user_id,
            token = token.token(),
            "verification token for local delivery"
        );
    }
}
