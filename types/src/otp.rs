//! One-time password value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::modhex;

/// Number of leading characters that identify the emitting device.
pub const DEVICE_ID_LEN: usize = 12;

/// A one-time password as submitted by a user, plus its normalized form.
///
/// Construction never fails and never performs I/O: malformed tokens are
/// rejected by the validation server, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpToken {
    raw: String,
    normalized: String,
    /// On-device 8 Hz timestamp counter, known only after a verification
    /// round that requested it.
    timestamp: Option<u64>,
}

impl OtpToken {
    /// Build a token, normalizing it through the modhex translator.
    pub fn new(raw: impl Into<String>) -> Self {
        Self::with_translation(raw, true)
    }

    /// Build a token, optionally skipping modhex translation.
    pub fn with_translation(raw: impl Into<String>, translate: bool) -> Self {
        let raw = raw.into();
        let normalized = if translate {
            modhex::normalize(&raw)
        } else {
            raw.clone()
        };
        Self {
            raw,
            normalized,
            timestamp: None,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The token as it is sent to validation servers.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The first [`DEVICE_ID_LEN`] characters of the normalized token
    /// (the whole token if it is shorter).
    pub fn device_id(&self) -> &str {
        let end = self
            .normalized
            .char_indices()
            .nth(DEVICE_ID_LEN)
            .map(|(idx, _)| idx)
            .unwrap_or(self.normalized.len());
        &self.normalized[..end]
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    /// Record the device timestamp counter reported by a validation server.
    pub fn set_timestamp(&mut self, ticks: u64) {
        self.timestamp = Some(ticks);
    }
}

impl fmt::Display for OtpToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}
