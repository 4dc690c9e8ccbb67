//! The delivery seam
//!
//! A [`Transport`] accepts a composed message and owns every network
//! concern: connecting, credentials, TLS, and the delivery
//! acknowledgment. The dispatch core only prepares the message and calls
//! [`deliver`](Transport::deliver); a failure is surfaced to the caller
//! unchanged, never retried.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::OutgoingMessage;

/// Errors surfaced by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to reach the mail server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server refused the message.
    #[error("message rejected: {0}")]
    Rejected(String),

    /// TLS negotiation failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// I/O error during delivery.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Account credentials for the SMTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// The account username.
    pub username: String,
    /// The account password.
    pub password: String,
}

/// SMTP account settings handed to the transport on every delivery.
///
/// Optional on the sender: when absent, the transport falls back to its
/// own defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// The SMTP host to connect to.
    pub host: String,

    /// The SMTP port.
    ///
    /// Default: 587 (submission)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Account credentials.
    pub credentials: Credentials,

    /// The envelope from-address.
    pub from: String,
}

const fn default_port() -> u16 {
    587
}

/// Capability for delivering composed messages.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a composed message, awaited to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when delivery fails; the caller does
    /// not retry.
    async fn deliver(
        &self,
        message: &OutgoingMessage,
        config: Option<&SmtpConfig>,
        use_ssl: bool,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn deliver(
        &self,
        message: &OutgoingMessage,
        config: Option<&SmtpConfig>,
        use_ssl: bool,
    ) -> Result<(), TransportError> {
        (**self).deliver(message, config, use_ssl).await
    }
}

/// A transport that records delivered messages instead of sending them.
///
/// Used by the integration tests, and handy for wiring checks in
/// environments where no mail must ever leave the process.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    delivered: Mutex<Vec<OutgoingMessage>>,
    reject_with: Mutex<Option<String>>,
}

impl RecordingTransport {
    /// Create an empty recording transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent delivery fail with a rejection.
    pub fn reject_with(&self, reason: impl Into<String>) {
        *self.reject_with.lock() = Some(reason.into());
    }

    /// Messages delivered so far, in order.
    #[must_use]
    pub fn delivered(&self) -> Vec<OutgoingMessage> {
        self.delivered.lock().clone()
    }

    /// Number of messages delivered so far.
    #[must_use]
    pub fn delivery_count(&self) -> usize {
        self.delivered.lock().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver(
        &self,
        message: &OutgoingMessage,
        _config: Option<&SmtpConfig>,
        _use_ssl: bool,
    ) -> Result<(), TransportError> {
        if let Some(reason) = self.reject_with.lock().clone() {
            return Err(TransportError::Rejected(reason));
        }

        tracing::trace!(subject = %message.subject, "recording delivery");
        self.delivered.lock().push(message.clone());
        Ok(())
    }
}
