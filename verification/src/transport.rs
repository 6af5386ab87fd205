//! The HTTP GET capability the engine races over.

use async_trait::async_trait;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::VerifyError;

/// Why a single endpoint produced no body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Certificate or handshake failure. Treated as a security event.
    #[error("TLS error: {0}")]
    Tls(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Request(String),
}

/// Issue a GET request and return the response body.
///
/// Implementations must honour `timeout` for the whole exchange.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

/// `reqwest`-backed transport with rustls.
///
/// TLS verification follows the client configuration; a configured trust
/// bundle is added as an extra root.
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn from_config(config: &ClientConfig) -> Result<Self, VerifyError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_tls());

        if let Some(path) = config.trust_bundle() {
            let pem = std::fs::read(path).map_err(|e| VerifyError::TrustBundle {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
                VerifyError::TrustBundle {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        let http_client = builder
            .build()
            .map_err(|e| VerifyError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let response = self
            .http_client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(classify)?;
        Ok(body.to_vec())
    }
}

/// Map a reqwest error onto [`TransportError`].
fn classify(err: reqwest::Error) -> TransportError {
    if let Some(tls) = find_tls_error(&err) {
        return TransportError::Tls(tls.to_string());
    }
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Walk the source chain looking for a rustls error.
///
/// `io::Error::source` skips its wrapped error, so wrapped payloads are
/// inspected through `get_ref` as well.
fn find_tls_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a rustls::Error> {
    let mut current: Option<&'a (dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(tls) = e.downcast_ref::<rustls::Error>() {
            return Some(tls);
        }
        if let Some(inner) = e
            .downcast_ref::<std::io::Error>()
            .and_then(|io| io.get_ref())
            .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        {
            return Some(inner);
        }
        current = e.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_rustls_error_inside_io_error() {
        let io = std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            rustls::Error::InvalidCertificate(rustls::CertificateError::UnknownIssuer),
        );
        assert!(find_tls_error(&io).is_some());
    }

    #[test]
    fn plain_io_error_is_not_tls() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(find_tls_error(&io).is_none());
    }

    #[test]
    fn builds_from_default_config() {
        let config = ClientConfig::builder("1234").build().unwrap();
        assert!(HttpTransport::from_config(&config).is_ok());
    }
}
