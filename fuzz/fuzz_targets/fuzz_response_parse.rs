#![no_main]

use libfuzzer_sys::fuzz_target;
use yubiotp_crypto::SharedKey;
use yubiotp_protocol::{parse_response, ProtocolError};

// Response bodies come straight off the network; parsing must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    match parse_response(body) {
        Ok(parsed) => {
            assert!(
                !parsed.canonical.split('&').any(|pair| pair.starts_with("h=")),
                "signature leaked into canonical form"
            );
            if let Ok(key) = SharedKey::from_bytes(b"fuzz".to_vec()) {
                let _ = parsed.check_signature(&key);
            }
            let _ = parsed.echo_mismatch("cccccccccccc", "nonce");
            let _ = parsed.params.timestamp();
        }
        Err(ProtocolError::AmbiguousStatus { count }) => assert!(count > 1),
        Err(_) => {}
    }
});
