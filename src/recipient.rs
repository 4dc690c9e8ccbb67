//! Recipient value object
//!
//! A [`Recipient`] ties a validated, lowercased address to an envelope
//! role and an optional display name. Construction is the only place
//! validation happens; the value is immutable afterwards.

use std::fmt::{self, Display};

use thiserror::Error;

use crate::address;

/// Errors raised when constructing a [`Recipient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipientError {
    /// The address failed syntactic validation.
    #[error("provided e-mail address is invalid (value: {0:?})")]
    InvalidFormat(String),

    /// The input contained more than one `@`-delimited pair.
    #[error("multiple e-mail addresses for a single recipient are not allowed")]
    MultipleAddresses,
}

/// Envelope slot a recipient is routed into.
///
/// Marked non-exhaustive so additional slots can be introduced without a
/// breaking change; composition treats an unknown role as a fatal
/// programming defect rather than silently dropping the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Role {
    To,
    Cc,
    Bcc,
    ReplyTo,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::To => write!(f, "To"),
            Self::Cc => write!(f, "Cc"),
            Self::Bcc => write!(f, "Bcc"),
            Self::ReplyTo => write!(f, "ReplyTo"),
        }
    }
}

/// A validated message recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    email: String,
    display_name: String,
    role: Role,
}

impl Recipient {
    /// Create a recipient from a single e-mail address.
    ///
    /// The address is lowercased before validation and storage, so
    /// lookups and comparisons are case-insensitive. Local parts are
    /// technically case-sensitive, but treating them as such causes far
    /// more breakage than it prevents.
    ///
    /// # Errors
    ///
    /// Returns [`RecipientError::MultipleAddresses`] when the input holds
    /// more than one address, or [`RecipientError::InvalidFormat`] when
    /// validation fails.
    pub fn new(
        email: impl AsRef<str>,
        role: Role,
        display_name: impl Into<String>,
    ) -> Result<Self, RecipientError> {
        let email = email.as_ref().to_lowercase();

        if email.chars().filter(|&ch| ch == '@').count() > 1 {
            return Err(RecipientError::MultipleAddresses);
        }

        if !address::is_valid(&email) {
            return Err(RecipientError::InvalidFormat(email));
        }

        Ok(Self {
            email,
            display_name: display_name.into(),
            role,
        })
    }

    /// Shorthand for a primary (`To`) recipient with no display name.
    ///
    /// # Errors
    ///
    /// Same as [`Recipient::new`].
    pub fn to(email: impl AsRef<str>) -> Result<Self, RecipientError> {
        Self::new(email, Role::To, "")
    }

    /// The validated, lowercased address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The display name, possibly empty.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The envelope role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

impl Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.trim().is_empty() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "{} <{}>", self.display_name, self.email)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lowercases_before_storing() {
        let recipient = Recipient::to("First.Last@Example.COM").unwrap();
        assert_eq!(recipient.email(), "first.last@example.com");
        assert_eq!(recipient.role(), Role::To);
    }

    #[test]
    fn rejects_invalid_address() {
        let err = Recipient::to("email@example").unwrap_err();
        assert!(matches!(err, RecipientError::InvalidFormat(_)));
    }

    #[test]
    fn rejects_address_list() {
        // Each part is valid on its own; together they are not one recipient.
        let err = Recipient::to("a@b.com,c@d.com").unwrap_err();
        assert_eq!(err, RecipientError::MultipleAddresses);
    }

    #[test]
    fn display_uses_bare_address_without_name() {
        let recipient = Recipient::to("email@example.com").unwrap();
        assert_eq!(recipient.to_string(), "email@example.com");

        let blank = Recipient::new("email@example.com", Role::Cc, "   ").unwrap();
        assert_eq!(blank.to_string(), "email@example.com");
    }

    #[test]
    fn display_wraps_address_with_name() {
        let recipient = Recipient::new("email@example.com", Role::To, "Joe Smith").unwrap();
        assert_eq!(recipient.to_string(), "Joe Smith <email@example.com>");
    }

    #[test]
    fn role_display_matches_log_format() {
        assert_eq!(Role::To.to_string(), "To");
        assert_eq!(Role::Cc.to_string(), "Cc");
        assert_eq!(Role::Bcc.to_string(), "Bcc");
        assert_eq!(Role::ReplyTo.to_string(), "ReplyTo");
    }
}
