//! Yubico Validation Protocol 2.0 wire format.
//!
//! Builds signed verification queries and parses the text responses returned
//! by validation servers.

pub mod error;
pub mod query;
pub mod response;
pub mod version;

pub use error::ProtocolError;
pub use query::VerificationRequest;
pub use response::{parse_response, EchoField, ParsedResponse};
pub use version::{DEFAULT_API_URLS, PROTOCOL_VERSION};
