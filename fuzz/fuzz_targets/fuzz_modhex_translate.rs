#![no_main]

use libfuzzer_sys::fuzz_target;
use yubiotp_types::modhex::{interpretations, is_modhex, normalize};

fuzz_target!(|input: &str| {
    let normalized = normalize(input);

    // Normalizing twice changes nothing.
    assert_eq!(normalize(&normalized), normalized);

    let candidates = interpretations(input);
    if candidates.is_empty() {
        assert_eq!(normalized, input);
    } else {
        assert!(candidates.contains(&normalized));
        assert!(is_modhex(&normalized));
        assert_eq!(normalized.chars().count(), input.chars().count());
    }
});
