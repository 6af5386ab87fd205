use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("shared key is not valid base64: {0}")]
    InvalidKeyEncoding(String),

    #[error("shared key is empty")]
    EmptyKey,

    #[error("random number generator failure: {0}")]
    Rng(String),
}
