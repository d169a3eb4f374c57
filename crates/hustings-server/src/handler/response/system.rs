//! System configuration response types.

use serde::{Deserialize, Serialize};

use crate::service::{FeatureFlag, FeatureFlags as EnabledFlags};

/// The features enabled on this deployment.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Enabled flags, sorted.
    pub enabled: Vec<FeatureFlag>,
}

impl FeatureFlags {
    /// Creates a FeatureFlags response from the service configuration.
    pub fn from_flags(flags: &EnabledFlags) -> Self {
        Self {
            enabled: flags.enabled(),
        }
    }
}
