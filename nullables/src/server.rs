//! Scripted validation server: builds response bodies for a request URL.

use std::collections::BTreeMap;

use url::Url;
use yubiotp_crypto::{SharedKey, SIGNATURE_PARAM};

/// Answers verification requests the way a validation server would.
///
/// By default it echoes the request's `otp` and `nonce`, includes the
/// device timestamp when asked for it and one is known, and signs the body
/// when given a key.
#[derive(Clone, Debug)]
pub struct MockValidationServer {
    status: String,
    key: Option<SharedKey>,
    echo: bool,
    otp_override: Option<String>,
    nonce_override: Option<String>,
    timestamps: BTreeMap<String, u64>,
    extra: Vec<(String, String)>,
    raw_body: Option<String>,
}

impl MockValidationServer {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            key: None,
            echo: true,
            otp_override: None,
            nonce_override: None,
            timestamps: BTreeMap::new(),
            extra: Vec::new(),
            raw_body: None,
        }
    }

    pub fn ok() -> Self {
        Self::new("OK")
    }

    /// Always answer with `body`, ignoring the request.
    pub fn raw(body: impl Into<String>) -> Self {
        Self {
            raw_body: Some(body.into()),
            ..Self::new("")
        }
    }

    pub fn signed_with(mut self, key: SharedKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Leave `otp` and `nonce` out of the response.
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Echo `otp` instead of the requested one.
    pub fn echo_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp_override = Some(otp.into());
        self
    }

    /// Echo `nonce` instead of the requested one.
    pub fn echo_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce_override = Some(nonce.into());
        self
    }

    /// Device timestamp reported for `otp` when the request asks for one.
    pub fn timestamp_for(mut self, otp: impl Into<String>, ticks: u64) -> Self {
        self.timestamps.insert(otp.into(), ticks);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Response body for a request to `url`.
    pub fn respond(&self, url: &str) -> Vec<u8> {
        if let Some(body) = &self.raw_body {
            return body.clone().into_bytes();
        }

        let query: BTreeMap<String, String> = Url::parse(url)
            .map(|u| u.query_pairs().into_owned().collect())
            .unwrap_or_default();
        let requested = |name: &str| query.get(name).cloned().unwrap_or_default();

        let mut pairs: Vec<(String, String)> = Vec::new();
        if self.echo {
            let otp = self.otp_override.clone().unwrap_or_else(|| requested("otp"));
            let nonce = self.nonce_override.clone().unwrap_or_else(|| requested("nonce"));
            pairs.push(("otp".into(), otp));
            pairs.push(("nonce".into(), nonce));
        }
        pairs.push(("t".into(), "2013-11-09T11:49:14Z0548".into()));
        if query.get("timestamp").is_some_and(|v| v == "1") {
            if let Some(ticks) = self.timestamps.get(&requested("otp")) {
                pairs.push(("timestamp".into(), ticks.to_string()));
                pairs.push(("sessioncounter".into(), "3".into()));
                pairs.push(("sessionuse".into(), "1".into()));
            }
        }
        pairs.extend(self.extra.iter().cloned());
        pairs.push(("status".into(), self.status.clone()));

        let mut body = String::new();
        if let Some(key) = &self.key {
            let signature = yubiotp_crypto::sign(
                key,
                pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
            body.push_str(&format!("{SIGNATURE_PARAM}={signature}\r\n"));
        }
        for (k, v) in &pairs {
            body.push_str(&format!("{k}={v}\r\n"));
        }
        body.push_str("\r\n");
        body.into_bytes()
    }
}
