//! Validation server responses.
//!
//! A response body is a list of `key=value` pairs separated by line breaks
//! (CRLF or LF) and/or `&`. Exactly one `status=` field must be present. The
//! optional `h=` pair carries the server's signature over all other pairs.

use std::sync::LazyLock;

use regex::Regex;
use yubiotp_crypto::{canonicalize, SharedKey, SIGNATURE_PARAM};
use yubiotp_types::{ResponseParams, ResponseStatus};

use crate::ProtocolError;

static STATUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"status=([A-Z0-9_]+)").expect("status pattern compiles"));

/// A structurally valid validation response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedResponse {
    pub status: ResponseStatus,
    /// Decoded `h` value, if the server signed the response.
    pub signature: Option<String>,
    /// Canonical string of every pair except `h`, values as received.
    pub canonical: String,
    /// All pairs except `h`, values percent-decoded.
    pub params: ResponseParams,
}

/// Which echoed field disagrees with the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EchoField {
    Otp,
    Nonce,
}

impl EchoField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Otp => "OTP",
            Self::Nonce => "nonce",
        }
    }
}

impl ParsedResponse {
    /// Verify the response signature against `key`.
    ///
    /// Returns the locally computed signature on mismatch so callers can
    /// report both values.
    pub fn check_signature(&self, key: &SharedKey) -> Result<(), String> {
        let matches = self
            .signature
            .as_deref()
            .is_some_and(|claimed| yubiotp_crypto::verify_canonical(key, &self.canonical, claimed));
        if matches {
            Ok(())
        } else {
            Err(yubiotp_crypto::sign_canonical(key, &self.canonical))
        }
    }

    /// The first echoed field that differs from what was sent, if any.
    ///
    /// Absent fields are not a mismatch.
    pub fn echo_mismatch(&self, otp: &str, nonce: &str) -> Option<EchoField> {
        if self.params.otp().is_some_and(|echoed| echoed != otp) {
            return Some(EchoField::Otp);
        }
        if self.params.nonce().is_some_and(|echoed| echoed != nonce) {
            return Some(EchoField::Nonce);
        }
        None
    }
}

/// Extract every `status=` token (`[A-Z0-9_]+`) in the body.
fn status_tokens(body: &str) -> Vec<&str> {
    STATUS_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Split a body into its raw `key=value` pairs.
pub fn raw_pairs(body: &str) -> Vec<(&str, &str)> {
    body.lines()
        .map(str::trim)
        .flat_map(|line| line.split('&'))
        .filter_map(|segment| segment.split_once('='))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Parse a response body.
///
/// A missing status or undecodable value is recoverable
/// ([`ProtocolError::is_fatal`] is false); more than one status is not.
pub fn parse_response(body: &str) -> Result<ParsedResponse, ProtocolError> {
    let status = match status_tokens(body).as_slice() {
        [] => return Err(ProtocolError::MissingStatus),
        [single] => ResponseStatus::parse(single),
        many => return Err(ProtocolError::AmbiguousStatus { count: many.len() }),
    };

    let pairs = raw_pairs(body);
    let mut signature = None;
    let mut params = ResponseParams::new();
    for (key, value) in &pairs {
        let decoded = urlencoding::decode(value)
            .map_err(|e| ProtocolError::Malformed(format!("{key}: {e}")))?
            .into_owned();
        if *key == SIGNATURE_PARAM {
            signature = Some(decoded);
        } else {
            params.insert(*key, decoded);
        }
    }

    Ok(ParsedResponse {
        status,
        signature,
        canonical: canonicalize(pairs.iter().copied()),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNED_OK: &str = "h=vjhFxZrNHB5CjI6vhuSeF2n46a8=\r\n\
        t=2010-04-23T20:34:50Z0580\r\n\
        otp=cccccccbcjdifctrndncchkftchjlnbhvhtugdljibej\r\n\
        nonce=aef3a7835277a28da831005c2ae3b919e2076a62\r\n\
        sl=75\r\n\
        status=OK\r\n\r\n";

    #[test]
    fn parses_signed_response() {
        let parsed = parse_response(SIGNED_OK).unwrap();
        assert_eq!(parsed.status, ResponseStatus::Ok);
        assert_eq!(parsed.signature.as_deref(), Some("vjhFxZrNHB5CjI6vhuSeF2n46a8="));
        assert_eq!(parsed.params.get("sl"), Some("75"));
        assert!(!parsed.params.contains("h"));
        assert_eq!(
            parsed.canonical,
            "nonce=aef3a7835277a28da831005c2ae3b919e2076a62&\
             otp=cccccccbcjdifctrndncchkftchjlnbhvhtugdljibej&\
             sl=75&status=OK&t=2010-04-23T20:34:50Z0580"
        );
    }

    #[test]
    fn ampersand_separated_pairs() {
        let parsed = parse_response("status=OK&otp=different&nonce=n").unwrap();
        assert_eq!(parsed.params.otp(), Some("different"));
        assert_eq!(parsed.params.nonce(), Some("n"));
        assert_eq!(parsed.signature, None);
    }

    #[test]
    fn missing_status_is_recoverable() {
        let err = parse_response("<html>bad gateway</html>").unwrap_err();
        assert_eq!(err, ProtocolError::MissingStatus);
        assert!(!err.is_fatal());
        assert_eq!(parse_response("status=ok").unwrap_err(), ProtocolError::MissingStatus);
    }

    #[test]
    fn multiple_status_is_fatal() {
        let err = parse_response("status=OK\nstatus=BAD_OTP").unwrap_err();
        assert_eq!(err, ProtocolError::AmbiguousStatus { count: 2 });
        assert!(err.is_fatal());
    }

    #[test]
    fn status_inside_another_value_counts() {
        let err = parse_response("status=OK\ninfo=prevstatus=BAD_OTP").unwrap_err();
        assert_eq!(err, ProtocolError::AmbiguousStatus { count: 2 });
        assert_eq!(status_tokens("status=REPLAYED_OTP&status=lower"), vec!["REPLAYED_OTP"]);
    }

    #[test]
    fn values_are_percent_decoded_but_plus_is_kept() {
        let parsed = parse_response("status=OK\nh=ab%2Bc+d%3D\nt=a%20b").unwrap();
        assert_eq!(parsed.signature.as_deref(), Some("ab+c+d="));
        assert_eq!(parsed.params.server_time(), Some("a b"));
        assert_eq!(parsed.canonical, "status=OK&t=a%20b");
    }

    #[test]
    fn unknown_status_is_parsed() {
        let parsed = parse_response("status=SOMETHING_ELSE").unwrap();
        assert_eq!(parsed.status, ResponseStatus::Unknown("SOMETHING_ELSE".into()));
    }

    #[test]
    fn signature_check() {
        let key = SharedKey::from_bytes(b"secret123456".to_vec()).unwrap();
        let sig = yubiotp_crypto::sign(&key, [("status", "OK"), ("t", "now")]);
        let body = format!("h={sig}\nstatus=OK\nt=now\n");
        let parsed = parse_response(&body).unwrap();
        assert!(parsed.check_signature(&key).is_ok());

        let tampered = parse_response(&body.replace("t=now", "t=later")).unwrap();
        let expected = tampered.check_signature(&key).unwrap_err();
        assert_ne!(expected, sig);

        let unsigned = parse_response("status=OK").unwrap();
        assert!(unsigned.check_signature(&key).is_err());
    }

    #[test]
    fn echo_checks() {
        let parsed = parse_response("status=OK&otp=abc&nonce=xyz").unwrap();
        assert_eq!(parsed.echo_mismatch("abc", "xyz"), None);
        assert_eq!(parsed.echo_mismatch("abd", "xyz"), Some(EchoField::Otp));
        assert_eq!(parsed.echo_mismatch("abc", "xy"), Some(EchoField::Nonce));

        let bare = parse_response("status=OK").unwrap();
        assert_eq!(bare.echo_mismatch("abc", "xyz"), None);
    }
}
