//! Per-request nonces.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::CryptoError;

/// Length of the nonce sent with every request.
pub const NONCE_LEN: usize = 25;

/// Random bytes drawn per nonce (encodes to 40 base64 characters).
const NONCE_ENTROPY_BYTES: usize = 30;

/// Generate a fresh 25-character alphanumeric nonce.
///
/// 30 bytes from the OS RNG are base64 encoded with `+` and `/` replaced by
/// `x` and `z`, then truncated.
pub fn generate_nonce() -> Result<String, CryptoError> {
    let mut entropy = [0u8; NONCE_ENTROPY_BYTES];
    getrandom::getrandom(&mut entropy).map_err(|e| CryptoError::Rng(e.to_string()))?;
    let nonce = STANDARD
        .encode(entropy)
        .chars()
        .map(|c| match c {
            '+' => 'x',
            '/' => 'z',
            other => other,
        })
        .take(NONCE_LEN)
        .collect();
    Ok(nonce)
}
