//! Nullable infrastructure for deterministic testing.
//!
//! The verification engine reaches the network only through the
//! [`Transport`](yubiotp_verification::Transport) trait. This crate provides
//! an implementation that:
//! - Answers from scripted validation servers
//! - Records every request URL for assertions
//! - Simulates failures, slow endpoints and hangs
//!
//! Usage: pass a [`NullTransport`] to `Verifier::with_transport` in tests.

pub mod server;
pub mod transport;

pub use server::MockValidationServer;
pub use transport::{EndpointBehavior, NullTransport};
