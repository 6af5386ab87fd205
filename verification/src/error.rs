use std::path::PathBuf;

use thiserror::Error;
use yubiotp_crypto::CryptoError;
use yubiotp_protocol::ProtocolError;
use yubiotp_types::{ResponseParams, ResponseStatus, TypesError};

use crate::transport::TransportError;

/// Broad class of a [`VerifyError`], for callers that need to tell
/// misconfiguration from authentication failure from network trouble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad arguments to a call; raised before any I/O.
    CallerInput,
    /// Bad client configuration; raised at construction.
    Configuration,
    /// Local failure unrelated to input or network.
    Internal,
    /// Tampering indicators: signature, echo or status ambiguity, TLS.
    Security,
    /// A definitive negative status from a validation server.
    Status,
    /// No endpoint produced a terminal answer.
    Exhausted,
    /// The tokens of a multi-token check are inconsistent.
    Consistency,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    // ── Caller input / configuration ────────────────────────────────────
    #[error("URL \"{0}\" contains an invalid or missing scheme")]
    InvalidEndpoint(String),

    #[error("at least one validation endpoint is required")]
    NoEndpoints,

    #[error("invalid shared key: {0}")]
    InvalidKey(#[from] CryptoError),

    #[error("Invalid value provided for ca_certs_bundle_path argument: {}", .0.display())]
    TrustBundleNotFound(PathBuf),

    #[error("failed to load trust bundle {}: {reason}", .path.display())]
    TrustBundle { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("otp_list needs to contain at least two OTPs, got {count}")]
    TooFewTokens { count: usize },

    #[error("OTPs contain different device ids: {first} and {other}")]
    DeviceIdMismatch { first: String, other: String },

    // ── Security ────────────────────────────────────────────────────────
    #[error("Server response message signature verification failed (expected {expected}, got {received:?})")]
    SignatureMismatch {
        expected: String,
        received: Option<String>,
    },

    #[error("{reason}")]
    InvalidResponse {
        reason: String,
        response: String,
        parameters: Option<ResponseParams>,
    },

    #[error("TLS failure talking to {url}: {reason}")]
    Tls { url: String, reason: String },

    // ── Internal ────────────────────────────────────────────────────────
    #[error("nonce generation failed: {0}")]
    Nonce(String),

    // ── Status ──────────────────────────────────────────────────────────
    #[error("The client with ID {client_id} does not exist")]
    InvalidClientId { client_id: String },

    #[error("Yubico server returned the following status code: {status}")]
    StatusCode { status: ResponseStatus },

    #[error("OK response carries no timestamp: {0}")]
    MissingTimestamp(String),

    #[error("malformed response parameter: {0}")]
    InvalidParameter(#[from] TypesError),

    // ── Exhaustion ──────────────────────────────────────────────────────
    #[error("NO_VALID_ANSWERS")]
    NoValidAnswers,

    // ── Multi-token consistency ─────────────────────────────────────────
    #[error("delta is smaller than zero. First OTP appears to be older than the last one ({delta_ticks} ticks)")]
    NegativeDelta { delta_ticks: i128 },

    #[error("More than {max_window_secs} seconds have passed between generating the first and the last OTP ({delta_secs:.3}s).")]
    TimeWindowExceeded { max_window_secs: f64, delta_secs: f64 },
}

impl VerifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TooFewTokens { .. } | Self::DeviceIdMismatch { .. } => ErrorCategory::CallerInput,
            Self::InvalidEndpoint(_)
            | Self::NoEndpoints
            | Self::InvalidKey(_)
            | Self::TrustBundleNotFound(_)
            | Self::TrustBundle { .. }
            | Self::Config(_) => ErrorCategory::Configuration,
            Self::SignatureMismatch { .. } | Self::InvalidResponse { .. } | Self::Tls { .. } => {
                ErrorCategory::Security
            }
            Self::InvalidClientId { .. }
            | Self::StatusCode { .. }
            | Self::MissingTimestamp(_)
            | Self::InvalidParameter(_) => ErrorCategory::Status,
            Self::Nonce(_) => ErrorCategory::Internal,
            Self::NoValidAnswers => ErrorCategory::Exhausted,
            Self::NegativeDelta { .. } | Self::TimeWindowExceeded { .. } => {
                ErrorCategory::Consistency
            }
        }
    }

    /// The status code attached to a status error, if any.
    pub fn status_code(&self) -> Option<&ResponseStatus> {
        match self {
            Self::StatusCode { status } => Some(status),
            _ => None,
        }
    }

    pub(crate) fn from_transport(url: &str, err: &TransportError) -> Option<Self> {
        match err {
            TransportError::Tls(reason) => Some(Self::Tls {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            _ => None,
        }
    }

    pub(crate) fn from_protocol(err: ProtocolError, response: &str) -> Option<Self> {
        err.is_fatal().then(|| Self::InvalidResponse {
            reason: err.to_string(),
            response: response.to_string(),
            parameters: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(VerifyError::NoValidAnswers.category(), ErrorCategory::Exhausted);
        assert_eq!(
            VerifyError::TooFewTokens { count: 1 }.category(),
            ErrorCategory::CallerInput
        );
        assert_eq!(
            VerifyError::InvalidEndpoint("example.com".into()).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            VerifyError::SignatureMismatch {
                expected: "a".into(),
                received: None
            }
            .category(),
            ErrorCategory::Security
        );
    }

    #[test]
    fn malformed_response_parameter_is_a_status_error() {
        let err = VerifyError::from(TypesError::InvalidParameter {
            field: "timestamp",
            value: "abc".into(),
        });
        assert_eq!(err.category(), ErrorCategory::Status);
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn status_code_accessor() {
        let err = VerifyError::StatusCode {
            status: ResponseStatus::ReplayedOtp,
        };
        assert_eq!(err.status_code().map(|s| s.as_str()), Some("REPLAYED_OTP"));
        assert_eq!(err.category(), ErrorCategory::Status);
        assert!(VerifyError::NoValidAnswers.status_code().is_none());
    }

    #[test]
    fn messages() {
        assert_eq!(VerifyError::NoValidAnswers.to_string(), "NO_VALID_ANSWERS");
        assert_eq!(
            VerifyError::InvalidEndpoint("example.com".into()).to_string(),
            "URL \"example.com\" contains an invalid or missing scheme"
        );
        assert_eq!(
            VerifyError::InvalidClientId {
                client_id: "1234".into()
            }
            .to_string(),
            "The client with ID 1234 does not exist"
        );
        assert!(VerifyError::TimeWindowExceeded {
            max_window_secs: 7.0,
            delta_secs: 8.0
        }
        .to_string()
        .starts_with("More than 7 seconds have passed"));
    }

    #[test]
    fn only_fatal_protocol_errors_escalate() {
        assert!(VerifyError::from_protocol(ProtocolError::MissingStatus, "x").is_none());
        assert!(matches!(
            VerifyError::from_protocol(ProtocolError::AmbiguousStatus { count: 2 }, "x"),
            Some(VerifyError::InvalidResponse { .. })
        ));
    }
}
