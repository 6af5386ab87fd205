//! Status values returned by a validation server.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `status=` field of a validation response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// The OTP is valid.
    Ok,
    /// The OTP is invalid format.
    BadOtp,
    /// The OTP has already been seen by the service.
    ReplayedOtp,
    /// The HMAC signature verification failed.
    BadSignature,
    /// The request lacks a parameter.
    MissingParameter,
    /// The request id does not exist.
    NoSuchClient,
    /// The request id is not allowed to verify OTPs.
    OperationNotAllowed,
    /// Unexpected error in the server.
    BackendError,
    /// Server could not get requested number of syncs.
    NotEnoughAnswers,
    /// Server has seen the OTP/nonce combination before.
    ReplayedRequest,
    /// Anything the protocol does not define.
    Unknown(String),
}

impl ResponseStatus {
    /// Statuses that make an endpoint's answer non-terminal.
    pub const BAD: [ResponseStatus; 8] = [
        ResponseStatus::BadOtp,
        ResponseStatus::ReplayedOtp,
        ResponseStatus::BadSignature,
        ResponseStatus::MissingParameter,
        ResponseStatus::OperationNotAllowed,
        ResponseStatus::BackendError,
        ResponseStatus::NotEnoughAnswers,
        ResponseStatus::ReplayedRequest,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "OK" => Self::Ok,
            "BAD_OTP" => Self::BadOtp,
            "REPLAYED_OTP" => Self::ReplayedOtp,
            "BAD_SIGNATURE" => Self::BadSignature,
            "MISSING_PARAMETER" => Self::MissingParameter,
            "NO_SUCH_CLIENT" => Self::NoSuchClient,
            "OPERATION_NOT_ALLOWED" => Self::OperationNotAllowed,
            "BACKEND_ERROR" => Self::BackendError,
            "NOT_ENOUGH_ANSWERS" => Self::NotEnoughAnswers,
            "REPLAYED_REQUEST" => Self::ReplayedRequest,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::BadOtp => "BAD_OTP",
            Self::ReplayedOtp => "REPLAYED_OTP",
            Self::BadSignature => "BAD_SIGNATURE",
            Self::MissingParameter => "MISSING_PARAMETER",
            Self::NoSuchClient => "NO_SUCH_CLIENT",
            Self::OperationNotAllowed => "OPERATION_NOT_ALLOWED",
            Self::BackendError => "BACKEND_ERROR",
            Self::NotEnoughAnswers => "NOT_ENOUGH_ANSWERS",
            Self::ReplayedRequest => "REPLAYED_REQUEST",
            Self::Unknown(s) => s,
        }
    }

    /// Whether this status is in the protocol's "bad status" set.
    pub fn is_bad(&self) -> bool {
        Self::BAD.contains(self)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
