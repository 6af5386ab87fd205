//! Cryptographic primitives for Yubico OTP validation.
//!
//! - **HMAC-SHA1** request and response signatures over canonical parameter strings
//! - Base64 shared keys, wiped from memory on drop
//! - 25-character per-request nonces from the OS RNG

pub mod error;
pub mod key;
pub mod nonce;
pub mod sign;

pub use error::CryptoError;
pub use key::SharedKey;
pub use nonce::{generate_nonce, NONCE_LEN};
pub use sign::{canonicalize, sign, sign_canonical, verify, verify_canonical, SIGNATURE_PARAM};
