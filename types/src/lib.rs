//! Fundamental types for Yubico OTP validation.
//!
//! This crate defines the values shared across every other crate in the workspace:
//! the modhex translator, the OTP value object, sync levels, response statuses
//! and decoded response parameters.

pub mod error;
pub mod modhex;
pub mod otp;
pub mod params;
pub mod status;
pub mod sync_level;

pub use error::TypesError;
pub use otp::{OtpToken, DEVICE_ID_LEN};
pub use params::ResponseParams;
pub use status::ResponseStatus;
pub use sync_level::SyncLevel;
