//! Server-side sync level (`sl` request parameter).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Percentage of validation servers that must agree before an endpoint
/// answers, or one of the named presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SyncLevel {
    /// 0..=100 percent.
    Percent(u8),
    Fast,
    Secure,
}

impl SyncLevel {
    pub const MAX_PERCENT: u32 = 100;

    /// Build a percentage sync level, rejecting values above 100.
    pub fn percent(value: u32) -> Result<Self, TypesError> {
        if value > Self::MAX_PERCENT {
            return Err(TypesError::InvalidSyncLevel(value.to_string()));
        }
        Ok(Self::Percent(value as u8))
    }

    /// The value sent on the wire.
    pub fn as_param(&self) -> String {
        match self {
            Self::Percent(p) => p.to_string(),
            Self::Fast => "fast".to_string(),
            Self::Secure => "secure".to_string(),
        }
    }
}

impl FromStr for SyncLevel {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(Self::Fast),
            "secure" => Ok(Self::Secure),
            other => other
                .parse::<u32>()
                .map_err(|_| TypesError::InvalidSyncLevel(other.to_string()))
                .and_then(Self::percent),
        }
    }
}

impl TryFrom<String> for SyncLevel {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SyncLevel> for String {
    fn from(level: SyncLevel) -> Self {
        level.as_param()
    }
}

impl fmt::Display for SyncLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_param())
    }
}
