//! Caller-supplied message content capabilities
//!
//! The dispatch core never inspects section or attachment internals: a
//! section is only asked to render itself, and an attachment is carried
//! to the transport byte-for-byte.

/// A renderable fragment appended to the message body after the caller
/// content, in input order.
///
/// Implementations are supplied entirely by the caller; the core picks
/// [`to_html`](Emailable::to_html) or [`to_text`](Emailable::to_text)
/// based on the message format and concatenates whatever comes back.
pub trait Emailable: Sync {
    /// Render the fragment as plain text.
    fn to_text(&self) -> String;

    /// Render the fragment as HTML.
    fn to_html(&self) -> String;
}

/// An opaque attachment handed to the transport verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// The filename to use in the MIME header.
    pub filename: String,
    /// The MIME content type (e.g., "application/pdf").
    pub content_type: String,
    /// The attachment data.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create an attachment from raw data.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }
}
