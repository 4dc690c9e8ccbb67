//! Message composition
//!
//! [`Mail`] is the per-send input built by the caller, [`Composer`] turns
//! it into a transport-ready [`OutgoingMessage`]: test-mode marker first,
//! then the shared header, the caller content, each section's rendering,
//! and the shared footer, with recipients routed into their envelope
//! slots. The composer has no knowledge of the transport.

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;

use crate::{
    content::{Attachment, Emailable},
    recipient::{Recipient, Role},
};

/// Errors raised during composition.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A recipient carried a role outside the known enumeration. This is
    /// a programming defect, not a user-recoverable condition.
    #[error("unsupported recipient type: {0}")]
    UnsupportedRecipientType(String),
}

/// Per-send message input.
///
/// Defaults: empty content, no sections, no attachments, HTML format,
/// UTF-8 encoding.
///
/// # Examples
///
/// ```
/// use courier::Mail;
///
/// let mail = Mail::new("Weekly report")
///     .content("<h3>Numbers are up.</h3>");
/// ```
pub struct Mail<'a> {
    subject: String,
    content: String,
    sections: Vec<&'a dyn Emailable>,
    attachments: Vec<Attachment>,
    is_html: bool,
    encoding: Option<&'static Encoding>,
}

impl<'a> Mail<'a> {
    /// Create a message input with the given subject.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            content: String::new(),
            sections: Vec::new(),
            attachments: Vec::new(),
            is_html: true,
            encoding: None,
        }
    }

    /// Sets the message content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Appends a content section, rendered after the caller content.
    #[must_use]
    pub fn section(mut self, section: &'a dyn Emailable) -> Self {
        self.sections.push(section);
        self
    }

    /// Appends multiple content sections, preserving order.
    #[must_use]
    pub fn sections(mut self, sections: impl IntoIterator<Item = &'a dyn Emailable>) -> Self {
        self.sections.extend(sections);
        self
    }

    /// Appends an attachment, preserving order.
    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Compose the message in plain-text format.
    #[must_use]
    pub const fn text(mut self) -> Self {
        self.is_html = false;
        self
    }

    /// Compose the message in HTML format (the default).
    #[must_use]
    pub const fn html(mut self) -> Self {
        self.is_html = true;
        self
    }

    /// Overrides the body and subject encoding (default UTF-8).
    #[must_use]
    pub const fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }
}

/// A transport-ready message, built per send and released after use.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    /// The subject line.
    pub subject: String,
    /// The fully assembled body.
    pub body: String,
    /// Whether the body is HTML.
    pub is_html: bool,
    /// Body and subject encoding.
    pub encoding: &'static Encoding,
    /// Primary recipients.
    pub to: Vec<Recipient>,
    /// Carbon-copy recipients.
    pub cc: Vec<Recipient>,
    /// Blind-carbon-copy recipients.
    pub bcc: Vec<Recipient>,
    /// Reply-To addresses.
    pub reply_to: Vec<Recipient>,
    /// Attachments in input order.
    pub attachments: Vec<Attachment>,
}

/// Builds outgoing messages.
///
/// Holds the state shared across sends: whether test mode is active, the
/// decorated test marker, and the header/footer wrapped around every
/// message body.
#[derive(Debug, Clone)]
pub struct Composer {
    test_mode: bool,
    marker: String,
    mail_header: String,
    mail_footer: String,
}

impl Composer {
    /// Create a composer. `test_message` is decorated into the visible
    /// marker, e.g. `"TEST MESSAGE"` becomes `"* * * TEST MESSAGE * * *"`.
    #[must_use]
    pub fn new(
        test_mode: bool,
        test_message: &str,
        mail_header: impl Into<String>,
        mail_footer: impl Into<String>,
    ) -> Self {
        Self {
            test_mode,
            marker: format!("* * * {test_message} * * *"),
            mail_header: mail_header.into(),
            mail_footer: mail_footer.into(),
        }
    }

    /// The decorated marker prepended to every test-mode message.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Build a transport-ready message from the inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::UnsupportedRecipientType`] if a recipient
    /// carries an unknown role.
    pub fn compose(
        &self,
        recipients: &[Recipient],
        mail: &Mail<'_>,
    ) -> Result<OutgoingMessage, ComposeError> {
        let mut body = String::new();

        // The marker goes before anything else, so it stays visible even
        // when a header is configured.
        if self.test_mode {
            if mail.is_html {
                body.push_str("<p style=\"color: red\">");
                body.push_str(&self.marker);
                body.push_str("</p><br />");
            } else {
                body.push_str(&self.marker);
                body.push_str("\r\n");
            }
        }

        body.push_str(&self.mail_header);
        body.push_str(&mail.content);

        for section in &mail.sections {
            let rendered = if mail.is_html {
                section.to_html()
            } else {
                section.to_text()
            };
            body.push_str(&rendered);
        }

        body.push_str(&self.mail_footer);

        let mut message = OutgoingMessage {
            subject: mail.subject.clone(),
            body,
            is_html: mail.is_html,
            encoding: mail.encoding.unwrap_or(UTF_8),
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: Vec::new(),
            attachments: mail.attachments.clone(),
        };

        for recipient in recipients {
            let slot = match recipient.role() {
                Role::To => &mut message.to,
                Role::Cc => &mut message.cc,
                Role::Bcc => &mut message.bcc,
                Role::ReplyTo => &mut message.reply_to,
                #[allow(unreachable_patterns)]
                role => return Err(ComposeError::UnsupportedRecipientType(role.to_string())),
            };
            slot.push(recipient.clone());
        }

        Ok(message)
    }
}
