//! Verification options and results.

use std::time::Duration;

use yubiotp_types::{ResponseParams, ResponseStatus, SyncLevel};

use crate::transport::TransportError;
use crate::VerifyError;

/// Per-call options for [`Verifier::verify`](crate::Verifier::verify).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Ask servers for the device timestamp and session counters.
    pub timestamp: bool,
    pub sync_level: Option<SyncLevel>,
    /// Overrides the configured timeout for this call; also sent to the
    /// servers as their sync timeout.
    pub timeout: Option<Duration>,
    /// Return the response parameters instead of a bare success.
    pub return_response: bool,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }

    pub fn with_sync_level(mut self, level: SyncLevel) -> Self {
        self.sync_level = Some(level);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_response(mut self) -> Self {
        self.return_response = true;
        self
    }
}

/// Successful result of a verification round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    Valid,
    /// The OTP is valid; carries the winning server's response parameters.
    ValidWithParameters(ResponseParams),
}

impl VerificationOutcome {
    pub fn params(&self) -> Option<&ResponseParams> {
        match self {
            Self::Valid => None,
            Self::ValidWithParameters(params) => Some(params),
        }
    }
}

/// What one endpoint's answer means for the race.
#[derive(Debug)]
pub enum EndpointVerdict {
    /// Ends the race: success or a fail-fast error.
    Terminal(Result<VerificationOutcome, VerifyError>),
    /// A definitive but endpoint-local negative status; keep racing.
    Retryable(ResponseStatus),
    /// The body could not be understood; keep racing.
    Inconclusive(String),
    /// No body at all; keep racing.
    TransportFailure(TransportError),
}
