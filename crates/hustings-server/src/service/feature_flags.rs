//! Release toggles for whole groups of endpoints.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A named feature that can be switched on per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeatureFlag {
    /// Self-service account registration.
    Registration,
    /// Article comments.
    Comments,
    /// Campaign events and registrations.
    Events,
}

/// The set of enabled [`FeatureFlag`]s.
///
/// Parsed from a comma-separated list such as `registration,events`.
/// Routes gated on a flag that is not in the set answer 404.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags {
    enabled: HashSet<FeatureFlag>,
}

impl FeatureFlags {
    /// Creates a set with the given flags enabled.
    pub fn new(flags: impl IntoIterator<Item = FeatureFlag>) -> Self {
        Self {
            enabled: flags.into_iter().collect(),
        }
    }

    /// Creates a set with every flag enabled.
    pub fn all() -> Self {
        Self::new(FeatureFlag::iter())
    }

    /// Returns whether the flag is enabled.
    #[inline]
    pub fn is_enabled(&self, flag: FeatureFlag) -> bool {
        self.enabled.contains(&flag)
    }

    /// Returns the enabled flags in a stable order.
    pub fn enabled(&self) -> Vec<FeatureFlag> {
        let mut flags: Vec<_> = self.enabled.iter().copied().collect();
        flags.sort();
        flags
    }
}

impl FromStr for FeatureFlags {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let flags = s
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(FeatureFlag::from_str)
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(Self { enabled: flags })
    }
}

impl fmt::Display for FeatureFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: Vec<String> = self.enabled().iter().map(ToString::to_string).collect();
        f.write_str(&flags.join(","))
    }
}
