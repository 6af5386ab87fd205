//! Decoded key/value parameters of a validation response.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::TypesError;

/// Parameters of a validation response, with percent-decoded values.
///
/// The signature (`h`) is never part of this map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseParams(BTreeMap<String, String>);

impl ResponseParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Echoed OTP.
    pub fn otp(&self) -> Option<&str> {
        self.get("otp")
    }

    /// Echoed nonce.
    pub fn nonce(&self) -> Option<&str> {
        self.get("nonce")
    }

    /// Server timestamp in UTC (`t`).
    pub fn server_time(&self) -> Option<&str> {
        self.get("t")
    }

    /// Device 8 Hz timestamp counter, present when requested with `timestamp=1`.
    pub fn timestamp(&self) -> Result<Option<u64>, TypesError> {
        self.parse_u64("timestamp")
    }

    /// Device session counter, present when requested with `timestamp=1`.
    pub fn session_counter(&self) -> Result<Option<u64>, TypesError> {
        self.parse_u64("sessioncounter")
    }

    /// Device session use, present when requested with `timestamp=1`.
    pub fn session_use(&self) -> Result<Option<u64>, TypesError> {
        self.parse_u64("sessionuse")
    }

    /// Percentage of external validation servers that replied.
    pub fn sync_level(&self) -> Result<Option<u64>, TypesError> {
        self.parse_u64("sl")
    }

    fn parse_u64(&self, field: &'static str) -> Result<Option<u64>, TypesError> {
        self.get(field)
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|_| TypesError::InvalidParameter {
                        field,
                        value: v.to_string(),
                    })
            })
            .transpose()
    }
}

impl FromIterator<(String, String)> for ResponseParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
