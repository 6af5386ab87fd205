//! Nullable transport: scripted endpoints, recorded requests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use yubiotp_verification::{Transport, TransportError};

use crate::server::MockValidationServer;

/// What a scripted endpoint does when it is called.
#[derive(Clone, Debug)]
pub enum EndpointBehavior {
    Respond(MockValidationServer),
    Fail(TransportError),
    /// Never answers; the call runs into its timeout.
    Hang,
}

#[derive(Clone, Debug)]
struct Script {
    behavior: EndpointBehavior,
    delay: Duration,
}

/// A transport that never touches the network.
///
/// Endpoints are matched on the URL part before `?`. Calls to endpoints that
/// were never scripted fail with a connection error.
#[derive(Debug, Default)]
pub struct NullTransport {
    scripts: Mutex<HashMap<String, Script>>,
    requests: Mutex<Vec<String>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, endpoint: &str, server: MockValidationServer) -> Self {
        self.script(endpoint, EndpointBehavior::Respond(server), Duration::ZERO)
    }

    /// Answer after `delay`, or time out if `delay` exceeds the call's timeout.
    pub fn respond_after(
        self,
        endpoint: &str,
        delay: Duration,
        server: MockValidationServer,
    ) -> Self {
        self.script(endpoint, EndpointBehavior::Respond(server), delay)
    }

    pub fn fail(self, endpoint: &str, error: TransportError) -> Self {
        self.script(endpoint, EndpointBehavior::Fail(error), Duration::ZERO)
    }

    pub fn hang(self, endpoint: &str) -> Self {
        self.script(endpoint, EndpointBehavior::Hang, Duration::ZERO)
    }

    fn script(self, endpoint: &str, behavior: EndpointBehavior, delay: Duration) -> Self {
        self.scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(endpoint.to_string(), Script { behavior, delay });
        self
    }

    /// Every URL requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Transport for NullTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        let endpoint = url.split('?').next().unwrap_or(url);
        let script = self
            .scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(endpoint)
            .cloned();
        let Some(script) = script else {
            return Err(TransportError::Connect(format!("no route to {endpoint}")));
        };

        if matches!(script.behavior, EndpointBehavior::Hang) || script.delay >= timeout {
            tokio::time::sleep(timeout).await;
            return Err(TransportError::Timeout);
        }
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        match script.behavior {
            EndpointBehavior::Respond(server) => Ok(server.respond(url)),
            EndpointBehavior::Fail(error) => Err(error),
            EndpointBehavior::Hang => Err(TransportError::Timeout),
        }
    }
}
