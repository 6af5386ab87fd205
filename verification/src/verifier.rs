//! The verification engine.
//!
//! One call fans a signed query out to every configured endpoint and races
//! the answers:
//!
//! 1. A fresh nonce is generated and the query signed (if a key is set).
//! 2. One task per endpoint is spawned into a [`JoinSet`], all bound to the
//!    same timeout.
//! 3. Answers are evaluated in arrival order. The first terminal verdict
//!    (success, or a fail-fast error) ends the race and the remaining tasks
//!    are aborted. Soft failures are dropped and the race continues.
//! 4. If every endpoint is exhausted, or the timeout elapses first, the call
//!    fails with [`VerifyError::NoValidAnswers`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use yubiotp_crypto::generate_nonce;
use yubiotp_protocol::{parse_response, VerificationRequest};
use yubiotp_types::{OtpToken, ResponseStatus};

use crate::config::ClientConfig;
use crate::multi::{check_time_window, check_token_set, TimeWindowCheck};
use crate::outcomes::{EndpointVerdict, VerificationOutcome, VerifyOptions};
use crate::transport::{HttpTransport, Transport};
use crate::VerifyError;

/// Verifies OTPs against a set of validation servers.
///
/// Cheap to share: the configuration and transport sit behind `Arc`s.
pub struct Verifier<T: Transport = HttpTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
}

impl<T: Transport> Clone for Verifier<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Verifier<HttpTransport> {
    /// Create a verifier that talks HTTP(S) to the configured endpoints.
    pub fn new(config: ClientConfig) -> Result<Self, VerifyError> {
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Verifier<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the OTP value object the way this client is configured to.
    pub fn token(&self, otp: &str) -> OtpToken {
        OtpToken::with_translation(otp, self.config.translate_otp())
    }

    /// Verify a single OTP.
    pub async fn verify(
        &self,
        otp: &str,
        options: &VerifyOptions,
    ) -> Result<VerificationOutcome, VerifyError> {
        self.verify_token(&self.token(otp), options).await
    }

    /// Verify a single OTP with default options.
    ///
    /// `Ok(false)` when a server reports the OTP as replayed or a response
    /// signature does not verify. Every other failure is returned as `Err`.
    pub async fn is_valid(&self, otp: &str) -> Result<bool, VerifyError> {
        match self.verify(otp, &VerifyOptions::default()).await {
            Ok(_) => Ok(true),
            Err(VerifyError::StatusCode {
                status: ResponseStatus::ReplayedOtp,
            })
            | Err(VerifyError::SignatureMismatch { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Verify an already built token.
    pub async fn verify_token(
        &self,
        otp: &OtpToken,
        options: &VerifyOptions,
    ) -> Result<VerificationOutcome, VerifyError> {
        let nonce = generate_nonce().map_err(|e| VerifyError::Nonce(e.to_string()))?;
        let mut request = VerificationRequest::new(otp, nonce);
        request.timestamp = options.timestamp;
        request.sync_level = options.sync_level;
        request.timeout = options.timeout;

        let timeout = options.timeout.unwrap_or(self.config.timeout());
        tracing::debug!(
            client_id = %self.config.client_id(),
            device_id = %otp.device_id(),
            endpoints = self.config.endpoints().len(),
            timeout_ms = timeout.as_millis() as u64,
            "verifying OTP"
        );
        self.race(&request, timeout, options.return_response).await
    }

    /// Verify a sequence of OTPs from one device and check that they were
    /// generated in order within `max_time_window` (the configured window
    /// when `None`).
    ///
    /// Token count and device ids are checked before any request is sent.
    /// Tokens are verified one after another, never concurrently.
    pub async fn verify_multi<S: AsRef<str>>(
        &self,
        otps: &[S],
        max_time_window: Option<Duration>,
        options: &VerifyOptions,
    ) -> Result<TimeWindowCheck, VerifyError> {
        let mut tokens: Vec<OtpToken> = otps.iter().map(|otp| self.token(otp.as_ref())).collect();
        check_token_set(&tokens)?;

        let options = VerifyOptions {
            timestamp: true,
            return_response: true,
            ..options.clone()
        };
        for token in &mut tokens {
            let outcome = self.verify_token(token, &options).await?;
            let ticks = match outcome.params() {
                Some(params) => params.timestamp()?,
                None => None,
            }
            .ok_or_else(|| VerifyError::MissingTimestamp(token.normalized().to_string()))?;
            token.set_timestamp(ticks);
        }

        let window = max_time_window.unwrap_or(self.config.max_time_window());
        let check = check_time_window(&tokens, window)?;
        tracing::debug!(
            device_id = %tokens[0].device_id(),
            tokens = tokens.len(),
            delta_ticks = check.delta_ticks,
            "multi-OTP time window satisfied"
        );
        Ok(check)
    }

    async fn race(
        &self,
        request: &VerificationRequest,
        timeout: Duration,
        return_response: bool,
    ) -> Result<VerificationOutcome, VerifyError> {
        let key = self.config.shared_key();
        let mut tasks = JoinSet::new();
        for endpoint in self.config.endpoints().iter() {
            let url = request.url_for(endpoint, self.config.client_id(), key);
            let endpoint = endpoint.to_string();
            let transport = Arc::clone(&self.transport);
            tracing::debug!(endpoint = %endpoint, "sending verification request");
            tasks.spawn(async move {
                let result = transport.get(&url, timeout).await;
                (endpoint, result)
            });
        }

        let race = async {
            while let Some(joined) = tasks.join_next().await {
                let (endpoint, result) = match joined {
                    Ok(finished) => finished,
                    Err(e) => {
                        tracing::warn!(error = %e, "endpoint task failed");
                        continue;
                    }
                };

                let verdict = match result {
                    Ok(body) => match String::from_utf8(body) {
                        Ok(body) => {
                            tracing::debug!(
                                endpoint = %endpoint,
                                response = %body,
                                "received response"
                            );
                            self.evaluate_response(&body, request, return_response)
                        }
                        Err(_) => EndpointVerdict::Inconclusive("response is not UTF-8".into()),
                    },
                    Err(err) => match VerifyError::from_transport(&endpoint, &err) {
                        Some(tls) => {
                            tracing::error!(
                                endpoint = %endpoint,
                                error = %err,
                                "TLS verification failed"
                            );
                            EndpointVerdict::Terminal(Err(tls))
                        }
                        None => EndpointVerdict::TransportFailure(err),
                    },
                };

                match verdict {
                    EndpointVerdict::Terminal(result) => return result,
                    EndpointVerdict::Retryable(status) => {
                        tracing::debug!(
                            endpoint = %endpoint,
                            status = %status,
                            "discarding answer"
                        );
                    }
                    EndpointVerdict::Inconclusive(reason) => {
                        tracing::debug!(
                            endpoint = %endpoint,
                            reason = %reason,
                            "inconclusive answer"
                        );
                    }
                    EndpointVerdict::TransportFailure(err) => {
                        tracing::warn!(
                            endpoint = %endpoint,
                            error = %err,
                            "failed to retrieve response"
                        );
                    }
                }
            }
            tracing::warn!("all validation endpoints exhausted");
            Err(VerifyError::NoValidAnswers)
        };

        let result = match tokio::time::timeout(timeout, race).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "no validation server answered in time"
                );
                Err(VerifyError::NoValidAnswers)
            }
        };
        tasks.abort_all();
        result
    }

    /// Classify one endpoint's response body.
    ///
    /// Checks run in order: structure, signature (when a key is configured),
    /// echoed otp/nonce, then status.
    pub fn evaluate_response(
        &self,
        body: &str,
        request: &VerificationRequest,
        return_response: bool,
    ) -> EndpointVerdict {
        let parsed = match parse_response(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                return match VerifyError::from_protocol(err.clone(), body) {
                    Some(fatal) => {
                        tracing::error!(error = %err, response = %body, "rejecting response");
                        EndpointVerdict::Terminal(Err(fatal))
                    }
                    None => EndpointVerdict::Inconclusive(err.to_string()),
                };
            }
        };

        if let Some(key) = self.config.shared_key() {
            if let Err(expected) = parsed.check_signature(key) {
                tracing::error!(
                    expected = %expected,
                    received = ?parsed.signature,
                    canonical = %parsed.canonical,
                    "signature mismatch"
                );
                return EndpointVerdict::Terminal(Err(VerifyError::SignatureMismatch {
                    expected,
                    received: parsed.signature,
                }));
            }
        }

        if let Some(field) = parsed.echo_mismatch(&request.otp, &request.nonce) {
            let reason = format!("Unexpected {} in response. Possible attack!", field.as_str());
            tracing::error!(response = %body, "{reason}");
            return EndpointVerdict::Terminal(Err(VerifyError::InvalidResponse {
                reason,
                response: body.to_string(),
                parameters: Some(parsed.params),
            }));
        }

        match parsed.status {
            ResponseStatus::Ok => EndpointVerdict::Terminal(Ok(if return_response {
                VerificationOutcome::ValidWithParameters(parsed.params)
            } else {
                VerificationOutcome::Valid
            })),
            ResponseStatus::NoSuchClient => {
                EndpointVerdict::Terminal(Err(VerifyError::InvalidClientId {
                    client_id: self.config.client_id().to_string(),
                }))
            }
            ResponseStatus::ReplayedOtp => EndpointVerdict::Terminal(Err(VerifyError::StatusCode {
                status: ResponseStatus::ReplayedOtp,
            })),
            other => EndpointVerdict::Retryable(other),
        }
    }
}
