//! HMAC-SHA1 signatures over canonicalized parameter sets.
//!
//! Canonical form: every parameter is rendered as `key=value`, the signature
//! parameter `h` is dropped, the pair strings are sorted lexicographically as
//! whole strings and joined with `&`. The HMAC-SHA1 digest of the UTF-8 bytes
//! is base64 encoded (standard alphabet, padded).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::SharedKey;

type HmacSha1 = Hmac<Sha1>;

/// Name of the signature parameter in requests and responses.
pub const SIGNATURE_PARAM: &str = "h";

/// Build the canonical string that is signed for a parameter set.
pub fn canonicalize<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut rendered: Vec<String> = pairs
        .into_iter()
        .filter(|(key, _)| *key != SIGNATURE_PARAM)
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    rendered.sort_unstable();
    rendered.join("&")
}

/// Keyed MAC over `canonical`.
///
/// # Panics
///
/// Never: HMAC accepts keys of any length, so `new_from_slice` cannot fail.
fn mac_for(key: &SharedKey, canonical: &str) -> HmacSha1 {
    let mut mac = <HmacSha1 as KeyInit>::new_from_slice(key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(canonical.as_bytes());
    mac
}

/// Sign an already canonicalized string.
pub fn sign_canonical(key: &SharedKey, canonical: &str) -> String {
    STANDARD.encode(mac_for(key, canonical).finalize().into_bytes())
}

/// Sign a parameter set.
pub fn sign<'a, I>(key: &SharedKey, pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    sign_canonical(key, &canonicalize(pairs))
}

/// Check a claimed signature against an already canonicalized string.
///
/// The digest comparison is constant-time. A claim that is not valid base64
/// never verifies.
pub fn verify_canonical(key: &SharedKey, canonical: &str, claimed: &str) -> bool {
    let Ok(claimed_bytes) = STANDARD.decode(claimed) else {
        return false;
    };
    mac_for(key, canonical).verify_slice(&claimed_bytes).is_ok()
}

/// Check a claimed signature against a parameter set.
pub fn verify<'a, I>(key: &SharedKey, pairs: I, claimed: &str) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    verify_canonical(key, &canonicalize(pairs), claimed)
}
