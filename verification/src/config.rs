//! Client configuration with TOML file support.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use yubiotp_crypto::SharedKey;
use yubiotp_protocol::version::{has_supported_scheme, DEFAULT_API_URLS};

use crate::VerifyError;

/// How long to wait for validation servers when the caller gives no timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How many seconds may pass between the first and last OTP of a
/// multi-token check.
pub const DEFAULT_MAX_TIME_WINDOW: Duration = Duration::from_secs(5);

/// Ordered, validated list of validation server URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointSet(Vec<String>);

impl EndpointSet {
    /// Validate and collect endpoint URLs. Each needs an explicit `http://`
    /// or `https://` scheme and a parseable host.
    pub fn new<I, S>(urls: I) -> Result<Self, VerifyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        if urls.is_empty() {
            return Err(VerifyError::NoEndpoints);
        }
        for url in &urls {
            if !has_supported_scheme(url) || url::Url::parse(url).is_err() {
                return Err(VerifyError::InvalidEndpoint(url.clone()));
            }
        }
        Ok(Self(urls))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for EndpointSet {
    fn default() -> Self {
        Self(DEFAULT_API_URLS.iter().map(|u| u.to_string()).collect())
    }
}

/// Immutable configuration of a verification client.
///
/// Built through [`ClientConfig::builder`] or loaded from TOML via
/// [`ClientConfig::from_toml_file`]. Every field is validated when the value
/// is built, so a `ClientConfig` that exists is usable.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    client_id: String,
    shared_key: Option<SharedKey>,
    endpoints: EndpointSet,
    trust_bundle: Option<PathBuf>,
    verify_tls: bool,
    timeout: Duration,
    translate_otp: bool,
    max_time_window: Duration,
}

impl ClientConfig {
    pub fn builder(client_id: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(client_id)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The shared secret. Without one, queries are not signed and response
    /// signatures are not checked.
    pub fn shared_key(&self) -> Option<&SharedKey> {
        self.shared_key.as_ref()
    }

    pub fn endpoints(&self) -> &EndpointSet {
        &self.endpoints
    }

    pub fn trust_bundle(&self) -> Option<&Path> {
        self.trust_bundle.as_deref()
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Per-call timeout used when a call does not override it.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn translate_otp(&self) -> bool {
        self.translate_otp
    }

    pub fn max_time_window(&self) -> Duration {
        self.max_time_window
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| VerifyError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, VerifyError> {
        let file: ClientConfigFile =
            toml::from_str(s).map_err(|e| VerifyError::Config(e.to_string()))?;
        file.into_builder()?.build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Clone)]
pub struct ClientConfigBuilder {
    client_id: String,
    shared_key: Option<String>,
    endpoints: Option<Vec<String>>,
    trust_bundle: Option<PathBuf>,
    verify_tls: bool,
    timeout: Duration,
    translate_otp: bool,
    max_time_window: Duration,
}

impl ClientConfigBuilder {
    fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            shared_key: None,
            endpoints: None,
            trust_bundle: None,
            verify_tls: true,
            timeout: DEFAULT_TIMEOUT,
            translate_otp: true,
            max_time_window: DEFAULT_MAX_TIME_WINDOW,
        }
    }

    /// Base64-encoded shared secret, decoded in [`build`](Self::build).
    pub fn shared_key(mut self, base64_key: impl Into<String>) -> Self {
        self.shared_key = Some(base64_key.into());
        self
    }

    /// Replace the default YubiCloud endpoints.
    pub fn endpoints<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    pub fn endpoint(self, url: impl Into<String>) -> Self {
        self.endpoints([url.into()])
    }

    /// PEM bundle of extra trusted CA certificates. The file must exist.
    pub fn trust_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.trust_bundle = Some(path.into());
        self
    }

    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn translate_otp(mut self, translate: bool) -> Self {
        self.translate_otp = translate;
        self
    }

    pub fn max_time_window(mut self, window: Duration) -> Self {
        self.max_time_window = window;
        self
    }

    pub fn build(self) -> Result<ClientConfig, VerifyError> {
        if self.client_id.is_empty() {
            return Err(VerifyError::Config("client id must not be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(VerifyError::Config("timeout must be greater than zero".into()));
        }

        let shared_key = self
            .shared_key
            .as_deref()
            .map(SharedKey::from_base64)
            .transpose()?;

        let endpoints = match self.endpoints {
            Some(urls) => EndpointSet::new(urls)?,
            None => EndpointSet::default(),
        };

        if let Some(path) = &self.trust_bundle {
            if !path.is_file() {
                return Err(VerifyError::TrustBundleNotFound(path.clone()));
            }
        }

        Ok(ClientConfig {
            client_id: self.client_id,
            shared_key,
            endpoints,
            trust_bundle: self.trust_bundle,
            verify_tls: self.verify_tls,
            timeout: self.timeout,
            translate_otp: self.translate_otp,
            max_time_window: self.max_time_window,
        })
    }
}

/// On-disk form of [`ClientConfig`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClientConfigFile {
    client_id: String,

    /// Base64 shared secret.
    #[serde(default)]
    shared_key: Option<String>,

    #[serde(default)]
    endpoints: Option<Vec<String>>,

    #[serde(default)]
    trust_bundle: Option<PathBuf>,

    #[serde(default = "default_true")]
    verify_tls: bool,

    #[serde(default = "default_timeout_secs")]
    timeout_secs: f64,

    #[serde(default = "default_true")]
    translate_otp: bool,

    #[serde(default = "default_max_time_window_secs")]
    max_time_window_secs: f64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> f64 {
    DEFAULT_TIMEOUT.as_secs_f64()
}

fn default_max_time_window_secs() -> f64 {
    DEFAULT_MAX_TIME_WINDOW.as_secs_f64()
}

fn secs_field(name: &str, secs: f64) -> Result<Duration, VerifyError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| VerifyError::Config(format!("{name} = {secs}: {e}")))
}

impl ClientConfigFile {
    fn into_builder(self) -> Result<ClientConfigBuilder, VerifyError> {
        let timeout = secs_field("timeout_secs", self.timeout_secs)?;
        let max_time_window = secs_field("max_time_window_secs", self.max_time_window_secs)?;

        let mut builder = ClientConfig::builder(self.client_id)
            .verify_tls(self.verify_tls)
            .timeout(timeout)
            .translate_otp(self.translate_otp)
            .max_time_window(max_time_window);
        if let Some(key) = self.shared_key {
            builder = builder.shared_key(key);
        }
        if let Some(endpoints) = self.endpoints {
            builder = builder.endpoints(endpoints);
        }
        if let Some(path) = self.trust_bundle {
            builder = builder.trust_bundle(path);
        }
        Ok(builder)
    }
}
