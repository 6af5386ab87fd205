use proptest::prelude::*;

use yubiotp_crypto::{canonicalize, sign, verify, SharedKey};

fn params() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,12}", "[A-Za-z0-9_.:=+/-]{0,40}"), 0..8)
}

proptest! {
    /// Signing is independent of the order the parameters are supplied in.
    #[test]
    fn sign_ignores_input_order(
        key in prop::collection::vec(any::<u8>(), 1..64),
        pairs in params(),
    ) {
        let key = SharedKey::from_bytes(key).unwrap();
        let mut reversed = pairs.clone();
        reversed.reverse();

        let a = sign(&key, pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let b = sign(&key, reversed.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        prop_assert_eq!(a, b);
    }

    /// A freshly produced signature always verifies.
    #[test]
    fn verify_accepts_own_signature(
        key in prop::collection::vec(any::<u8>(), 1..64),
        pairs in params(),
    ) {
        let key = SharedKey::from_bytes(key).unwrap();
        let borrowed: Vec<(&str, &str)> =
            pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let sig = sign(&key, borrowed.iter().copied());
        prop_assert!(verify(&key, borrowed.iter().copied(), &sig));
    }

    /// The signature parameter never appears in the canonical string.
    #[test]
    fn canonical_form_never_contains_signature(pairs in params(), h in "[A-Za-z0-9+/=]{0,28}") {
        let mut borrowed: Vec<(&str, &str)> =
            pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        borrowed.push(("h", h.as_str()));
        let canonical = canonicalize(borrowed.iter().copied());
        prop_assert!(!canonical.split('&').any(|pair| pair.starts_with("h=")));
    }
}
