//! Outbound e-mail dispatch with send pacing, test mode, and dry runs
//!
//! This crate validates recipient addresses, composes messages
//! (plain-text or HTML, with pluggable content sections and
//! attachments), and hands them to an SMTP [`Transport`] while pacing
//! consecutive sends. Two safety modes cover pre-production use: test
//! mode redirects every message to a fixed recipient set and prepends a
//! visible marker, and dry-run mode composes and logs without touching
//! the transport at all.
//!
//! The actual network transport is a capability the caller supplies;
//! this crate ships [`RecordingTransport`] for tests and wiring checks.
//!
//! # Examples
//!
//! ```
//! use courier::{Mail, Recipient, RecordingTransport, Sender, ThrottleConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sender = Sender::builder(RecordingTransport::new())
//!     .test_mode(false)
//!     .throttle(ThrottleConfig {
//!         group_size: 10,
//!         individual_gap_ms: 100,
//!         group_gap_ms: 2_000,
//!     })
//!     .build();
//!
//! let recipients = vec![Recipient::to("customer@example.com")?];
//! let log = sender
//!     .send(&recipients, Mail::new("Welcome!").content("<h3>Hello.</h3>"))
//!     .await?;
//! assert_eq!(log, "Notification sent: To: customer@example.com;");
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod content;
pub mod logging;
pub mod message;
pub mod recipient;
pub mod sender;
pub mod throttle;
pub mod transport;

pub use content::{Attachment, Emailable};
pub use message::{ComposeError, Composer, Mail, OutgoingMessage};
pub use recipient::{Recipient, RecipientError, Role};
pub use sender::{SendError, Sender, SenderBuilder, WaitMode};
pub use throttle::{Throttle, ThrottleConfig};
pub use transport::{
    Credentials, RecordingTransport, SmtpConfig, Transport, TransportError,
};
