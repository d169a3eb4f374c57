//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::validate_not_blank;

/// Request payload for self-service registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    /// Email address used to sign in.
    #[validate(email, length(max = 254))]
    pub email: String,
    /// Plain-text password, hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Public name shown next to articles and comments.
    #[validate(length(min = 2, max = 64), custom(function = "validate_not_blank"))]
    pub display_name: String,
}

impl Register {
    /// Returns the email address in its stored form.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Email address of the account.
    #[validate(email)]
    pub email: String,
    /// Password of the account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl Login {
    /// Returns the email address in its stored form.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Request payload for confirming an email address.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmail {
    /// The token delivered to the email address.
    #[validate(length(min = 1, max = 256))]
    pub token: String,
}
