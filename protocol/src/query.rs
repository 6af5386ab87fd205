//! Outgoing verification queries.

use std::time::Duration;

use url::form_urlencoded;
use yubiotp_crypto::{SharedKey, SIGNATURE_PARAM};
use yubiotp_types::{OtpToken, SyncLevel};

/// A single verification request, before it is rendered for an endpoint.
///
/// Every request carries its own nonce; the engine generates a fresh one per
/// call and never reuses it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    pub otp: String,
    pub nonce: String,
    /// Ask the server to include the device timestamp and session counters.
    pub timestamp: bool,
    pub sync_level: Option<SyncLevel>,
    /// Server-side sync timeout, sent in whole seconds.
    pub timeout: Option<Duration>,
}

impl VerificationRequest {
    pub fn new(otp: &OtpToken, nonce: impl Into<String>) -> Self {
        Self {
            otp: otp.normalized().to_string(),
            nonce: nonce.into(),
            timestamp: false,
            sync_level: None,
            timeout: None,
        }
    }

    /// Request parameters in wire order, unencoded.
    pub fn params(&self, client_id: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("id", client_id.to_string()),
            ("otp", self.otp.clone()),
            ("nonce", self.nonce.clone()),
        ];
        if self.timestamp {
            params.push(("timestamp", "1".to_string()));
        }
        if let Some(sl) = self.sync_level {
            params.push(("sl", sl.as_param()));
        }
        if let Some(secs) = self.timeout.map(|t| t.as_secs()).filter(|s| *s > 0) {
            params.push(("timeout", secs.to_string()));
        }
        params
    }

    /// Render the query string, signed with `key` when one is configured.
    ///
    /// The signature covers the url-encoded pairs and is appended last as
    /// `h=<percent-encoded base64>`.
    pub fn query_string(&self, client_id: &str, key: Option<&SharedKey>) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.params(client_id) {
            serializer.append_pair(name, &value);
        }
        let mut query = serializer.finish();

        if let Some(key) = key {
            let signature = yubiotp_crypto::sign(key, split_pairs(&query));
            query.push('&');
            query.push_str(SIGNATURE_PARAM);
            query.push('=');
            query.push_str(&urlencoding::encode(&signature));
        }
        query
    }

    /// Full request URL for one endpoint.
    pub fn url_for(&self, endpoint: &str, client_id: &str, key: Option<&SharedKey>) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{endpoint}{separator}{}",
            self.query_string(client_id, key)
        )
    }
}

/// Split an encoded `a=b&c=d` string into its pairs.
pub fn split_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
}
