use criterion::{black_box, criterion_group, criterion_main, Criterion};

use yubiotp_crypto::SharedKey;

fn request_params() -> Vec<(&'static str, &'static str)> {
    vec![
        ("id", "87"),
        ("otp", "vvvvvvcucrlcietctckflvnncdgckubflugerlnr"),
        ("nonce", "aef3a7835277a28da831005c2ae3b919e2076a62"),
        ("timestamp", "1"),
        ("sl", "secure"),
    ]
}

fn hmac_sha1_sign_bench(c: &mut Criterion) {
    let key = SharedKey::from_base64("mG5be6ZJU1qBGz24yPh/ESM3UdU=").unwrap();
    let params = request_params();

    c.bench_function("hmac_sha1_sign_request", |b| {
        b.iter(|| yubiotp_crypto::sign(&key, black_box(params.iter().copied())))
    });
}

fn hmac_sha1_verify_bench(c: &mut Criterion) {
    let key = SharedKey::from_base64("mG5be6ZJU1qBGz24yPh/ESM3UdU=").unwrap();
    let params = request_params();
    let sig = yubiotp_crypto::sign(&key, params.iter().copied());

    c.bench_function("hmac_sha1_verify_request", |b| {
        b.iter(|| yubiotp_crypto::verify(&key, black_box(params.iter().copied()), &sig))
    });
}

fn nonce_bench(c: &mut Criterion) {
    c.bench_function("generate_nonce", |b| b.iter(yubiotp_crypto::generate_nonce));
}

criterion_group!(benches, hmac_sha1_sign_bench, hmac_sha1_verify_bench, nonce_bench);
criterion_main!(benches);
