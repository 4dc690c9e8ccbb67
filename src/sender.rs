//! Send orchestration
//!
//! The [`Sender`] glues the pieces together: test-mode recipient
//! redirection, composition, pacing, and the transport call, producing a
//! human-readable log line per send. Pacing state lives behind a mutex
//! held for the whole send — wait and transport call included — so
//! concurrent sends on one instance are serialized end to end and the
//! spacing invariant holds.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    message::{ComposeError, Composer, Mail},
    recipient::Recipient,
    throttle::{Throttle, ThrottleConfig},
    transport::{SmtpConfig, Transport, TransportError},
};

/// Errors surfaced by [`Sender::send`].
#[derive(Debug, Error)]
pub enum SendError {
    /// Composition failed (a programming defect in recipient roles).
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// The transport failed to deliver. Not retried; no log line is
    /// produced for the attempt.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// How the pacing delay is waited out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitMode {
    /// Suspend only the current task; other tasks keep running.
    #[default]
    Cooperative,

    /// Stall the whole thread for the computed duration. Matches the
    /// strict blocking behavior some callers rely on, at the cost of
    /// freezing whatever else shares the thread.
    Blocking,
}

/// Sends e-mail messages through a [`Transport`] with pacing between
/// sends, a test mode that redirects all mail to a fixed recipient set,
/// and a dry-run mode that skips the transport entirely.
///
/// # Examples
///
/// ```
/// use courier::{Mail, Recipient, RecordingTransport, Sender};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let test_recipients = vec![Recipient::to("test@example.com")?];
/// let sender = Sender::builder(RecordingTransport::new())
///     .test_recipients(test_recipients)
///     .dry_run(true)
///     .build();
///
/// let recipients = vec![Recipient::to("customer@example.com")?];
/// let log = sender
///     .send(&recipients, Mail::new("Hello").content("Sent using courier.").text())
///     .await?;
/// assert!(log.starts_with("[DRY RUN] "));
/// # Ok(())
/// # }
/// ```
pub struct Sender<T> {
    transport: T,
    composer: Composer,
    test_recipients: Vec<Recipient>,
    test_mode: bool,
    dry_run: bool,
    use_ssl: bool,
    wait_mode: WaitMode,
    smtp_config: Option<SmtpConfig>,
    throttle: Mutex<Throttle>,
}

impl<T: Transport> Sender<T> {
    /// Start building a sender around the given transport.
    #[must_use]
    pub fn builder(transport: T) -> SenderBuilder<T> {
        SenderBuilder {
            transport,
            test_recipients: Vec::new(),
            test_mode: true,
            dry_run: false,
            use_ssl: true,
            mail_header: String::new(),
            mail_footer: String::new(),
            test_message: String::from("TEST MESSAGE"),
            throttle: ThrottleConfig::default(),
            wait_mode: WaitMode::default(),
        }
    }

    /// Replace the stored SMTP account settings; takes effect on the
    /// next send.
    pub fn configure(&mut self, config: SmtpConfig) {
        self.smtp_config = Some(config);
    }

    /// Whether test mode is enabled.
    #[must_use]
    pub const fn test_mode(&self) -> bool {
        self.test_mode
    }

    /// Whether dry-run mode is enabled.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether the transport is asked to encrypt the connection.
    #[must_use]
    pub const fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    /// The decorated marker included in every test-mode message.
    #[must_use]
    pub fn test_message(&self) -> &str {
        self.composer.marker()
    }

    /// The stored SMTP account settings, if configured.
    #[must_use]
    pub const fn smtp_config(&self) -> Option<&SmtpConfig> {
        self.smtp_config.as_ref()
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The instant just before the last message was handed to the
    /// transport, if any send has happened.
    pub async fn last_sent(&self) -> Option<Instant> {
        self.throttle.lock().await.last_sent()
    }

    /// Compose and send a message, returning the send log.
    ///
    /// In test mode the caller-supplied recipients are ignored entirely
    /// and the configured test recipients are used instead. The call
    /// waits out the pacing delay before handing the message to the
    /// transport; in dry-run mode the transport is skipped and the log
    /// is prefixed with `"[DRY RUN] "`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Compose`] for an unknown recipient role and
    /// [`SendError::Transport`] when delivery fails. A failed attempt
    /// produces no log line and is not retried.
    pub async fn send(
        &self,
        recipients: &[Recipient],
        mail: Mail<'_>,
    ) -> Result<String, SendError> {
        let recipients = if self.test_mode {
            &self.test_recipients
        } else {
            recipients
        };

        let message = self.composer.compose(recipients, &mail)?;

        // Serialization boundary: the lock spans delay computation, the
        // wait itself, and the transport call, so one send finishes
        // before the next begins.
        let mut throttle = self.throttle.lock().await;

        let delay = throttle.next_delay();
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "pacing before send");
            self.wait(delay).await;
        }
        throttle.mark_sent();

        let mut log = String::new();

        if self.dry_run {
            tracing::debug!(subject = %message.subject, "dry run, skipping transport");
            log.push_str("[DRY RUN] ");
        } else {
            self.transport
                .deliver(&message, self.smtp_config.as_ref(), self.use_ssl)
                .await?;
            tracing::info!(
                subject = %message.subject,
                recipients = recipients.len(),
                "message delivered"
            );
        }

        throttle.advance();
        drop(throttle);

        log.push_str("Notification sent: ");
        for recipient in recipients {
            log.push_str(&format!("{}: {};", recipient.role(), recipient.email()));
        }
        if !delay.is_zero() {
            log.push_str(&format!(" [{}ms time gap]", delay.as_millis()));
        }

        Ok(log)
    }

    async fn wait(&self, delay: Duration) {
        match self.wait_mode {
            WaitMode::Cooperative => tokio::time::sleep(delay).await,
            WaitMode::Blocking => std::thread::sleep(delay),
        }
    }
}

/// Builder for [`Sender`].
///
/// Defaults mirror careful-by-default dispatch: test mode on, dry run
/// off, SSL on, no pacing, cooperative waits.
pub struct SenderBuilder<T> {
    transport: T,
    test_recipients: Vec<Recipient>,
    test_mode: bool,
    dry_run: bool,
    use_ssl: bool,
    mail_header: String,
    mail_footer: String,
    test_message: String,
    throttle: ThrottleConfig,
    wait_mode: WaitMode,
}

impl<T: Transport> SenderBuilder<T> {
    /// Recipients substituted for the caller's list in test mode.
    #[must_use]
    pub fn test_recipients(mut self, recipients: Vec<Recipient>) -> Self {
        self.test_recipients = recipients;
        self
    }

    /// Enable or disable test mode (default: enabled).
    #[must_use]
    pub const fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    /// Enable or disable dry-run mode (default: disabled).
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Ask the transport to encrypt the connection (default: enabled).
    #[must_use]
    pub const fn use_ssl(mut self, enabled: bool) -> Self {
        self.use_ssl = enabled;
        self
    }

    /// Text included at the beginning of every message body.
    #[must_use]
    pub fn mail_header(mut self, header: impl Into<String>) -> Self {
        self.mail_header = header.into();
        self
    }

    /// Text included at the end of every message body.
    #[must_use]
    pub fn mail_footer(mut self, footer: impl Into<String>) -> Self {
        self.mail_footer = footer.into();
        self
    }

    /// The message decorated into the test-mode marker
    /// (default: `"TEST MESSAGE"`).
    #[must_use]
    pub fn test_message(mut self, message: impl Into<String>) -> Self {
        self.test_message = message.into();
        self
    }

    /// Pacing configuration (default: no pacing).
    #[must_use]
    pub fn throttle(mut self, config: ThrottleConfig) -> Self {
        self.throttle = config;
        self
    }

    /// Delay strategy for the pacing wait (default: cooperative).
    #[must_use]
    pub const fn wait_mode(mut self, mode: WaitMode) -> Self {
        self.wait_mode = mode;
        self
    }

    /// Build the sender.
    #[must_use]
    pub fn build(self) -> Sender<T> {
        Sender {
            transport: self.transport,
            composer: Composer::new(
                self.test_mode,
                &self.test_message,
                self.mail_header,
                self.mail_footer,
            ),
            test_recipients: self.test_recipients,
            test_mode: self.test_mode,
            dry_run: self.dry_run,
            use_ssl: self.use_ssl,
            wait_mode: self.wait_mode,
            smtp_config: None,
            throttle: Mutex::new(Throttle::new(self.throttle)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::transport::RecordingTransport;

    use super::*;

    #[test]
    fn builder_defaults_match_cautious_dispatch() {
        let sender = Sender::builder(RecordingTransport::new()).build();

        assert!(sender.test_mode());
        assert!(!sender.dry_run());
        assert!(sender.use_ssl());
        assert!(sender.smtp_config().is_none());
        assert_eq!(sender.test_message(), "* * * TEST MESSAGE * * *");
    }

    #[test]
    fn configure_replaces_smtp_settings() {
        let mut sender = Sender::builder(RecordingTransport::new()).build();

        let config: SmtpConfig = toml::from_str(
            r#"
            host = "smtp.example.com"
            from = "noreply@example.com"

            [credentials]
            username = "mailer"
            password = "hunter2"
            "#,
        )
        .unwrap();

        sender.configure(config);
        assert_eq!(
            sender.smtp_config().map(|config| config.host.as_str()),
            Some("smtp.example.com")
        );
    }
}
