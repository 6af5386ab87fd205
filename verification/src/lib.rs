//! Concurrent OTP verification against Yubico-compatible validation servers.
//!
//! A [`Verifier`] sends one signed query per configured endpoint, takes the
//! first authoritative answer and aborts the rest. Responses are checked for
//! signature, echoed otp/nonce and status before they count.
//!
//! [`Verifier::verify_multi`] additionally checks that several OTPs came from
//! one device, in order, within a time window.

pub mod config;
pub mod error;
pub mod multi;
pub mod outcomes;
pub mod transport;
pub mod verifier;

pub use config::{ClientConfig, ClientConfigBuilder, EndpointSet};
pub use error::{ErrorCategory, VerifyError};
pub use multi::{check_time_window, check_token_set, TimeWindowCheck, TICKS_PER_SECOND};
pub use outcomes::{EndpointVerdict, VerificationOutcome, VerifyOptions};
pub use transport::{HttpTransport, Transport, TransportError};
pub use verifier::Verifier;
