//! Credentials: session keys, password hashing and verification tokens.

mod notifier;
mod password_hasher;
mod session_keys;
mod verification_token;

pub use self::notifier::VerificationNotifier;
pub use self::password_hasher::PasswordHasher;
#[cfg(test)]
pub(crate) use self::session_keys::tests::test_session_keys;
pub use self::session_keys::{SessionKeys, SessionKeysConfig};
pub use self::verification_token::VerificationToken;
