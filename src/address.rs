//! Syntactic e-mail address validation
//!
//! This is a single-address check over the whole input string: anything
//! beyond one bare `local@domain` pair (display names, trailing comments,
//! address lists) is rejected. The rules are deliberately stricter than
//! the RFC grammars where strictness is the safer default for outbound
//! mail, so doubled dots and dotless domains are invalid even though a
//! server might tolerate them.
//!
//! Accepted shapes:
//! - `local@domain` with `+`, `.`, `_`, `-` and the usual atext symbols
//!   in the local part (no leading, trailing, or doubled dots)
//! - multi-label domains with hyphens inside labels and long or
//!   multi-part TLDs (`example.museum`, `example.co.jp`)
//! - IPv4-shaped domains (`user@123.123.123.123`)

/// Check whether `candidate` is a syntactically valid e-mail address.
///
/// Pure and side-effect free; performs no DNS lookup. Case-insensitive
/// handling is expected upstream (callers lowercase before validating).
#[must_use]
pub fn is_valid(candidate: &str) -> bool {
    let Some((local, domain)) = split_single_at(candidate) else {
        return false;
    };

    is_valid_local(local) && is_valid_domain(domain)
}

/// Split on `@`, requiring exactly one occurrence.
fn split_single_at(input: &str) -> Option<(&str, &str)> {
    let mut parts = input.splitn(3, '@');
    let local = parts.next()?;
    let domain = parts.next()?;

    if parts.next().is_some() {
        return None;
    }

    Some((local, domain))
}

/// Validate the local part: dot-separated runs of atext characters.
fn is_valid_local(local: &str) -> bool {
    if local.is_empty() || local.starts_with('.') || local.ends_with('.') {
        return false;
    }

    if local.contains("..") {
        return false;
    }

    local.chars().all(|ch| ch == '.' || is_local_atext(ch))
}

/// Validate the domain: at least two labels, each letter-digit-hyphen
/// delimited by letters or digits. The final label must be alphabetic
/// unless the whole domain is an IPv4-shaped literal.
fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    if domain.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    if !labels.iter().all(|label| is_valid_label(label)) {
        return false;
    }

    let numeric_literal = labels
        .iter()
        .all(|label| label.chars().all(|ch| ch.is_ascii_digit()));

    let last_is_alphabetic = labels
        .last()
        .is_some_and(|label| label.chars().all(|ch| ch.is_ascii_alphabetic()));

    numeric_literal || last_is_alphabetic
}

/// A domain label must start and end with a letter or digit, with
/// letters, digits, or hyphens in between.
fn is_valid_label(label: &str) -> bool {
    let starts_ok = label
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_alphanumeric());
    let ends_ok = label
        .chars()
        .last()
        .is_some_and(|ch| ch.is_ascii_alphanumeric());

    starts_ok && ends_ok && label.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

/// Characters permitted in an atom of the local part.
#[inline]
const fn is_local_atext(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Conformance set from https://codefool.tumblr.com/post/15288874550
    const ACCEPTED: &[&str] = &[
        "email@example.com",
        "firstname.lastname@example.com",
        "email@subdomain.example.com",
        "firstname+lastname@example.com",
        "email@123.123.123.123",
        "1234567890@example.com",
        "email@example-one.com",
        "_______@example.com",
        "email@example.name",
        "email@example.museum",
        "email@example.co.jp",
        "firstname-lastname@example.com",
    ];

    const REJECTED: &[&str] = &[
        "",
        "plainaddress",
        "#@%^%#$@#$@#.com",
        "@example.com",
        "Joe Smith <email@example.com>",
        "email.example.com",
        "email@example@example.com",
        ".email@example.com",
        "email.@example.com",
        "email..email@example.com",
        "あいうえお@example.com",
        "email@example.com (Joe Smith)",
        "email@example",
        "email@-example.com",
        "email@example..com",
        "Abc..123@example.com",
    ];

    #[test]
    fn accepts_conformance_set() {
        for address in ACCEPTED {
            assert!(is_valid(address), "expected {address:?} to be valid");
        }
    }

    #[test]
    fn rejects_conformance_set() {
        for address in REJECTED {
            assert!(!is_valid(address), "expected {address:?} to be invalid");
        }
    }

    #[test]
    fn rejects_surrounding_text() {
        assert!(!is_valid(" email@example.com"));
        assert!(!is_valid("email@example.com "));
        assert!(!is_valid("to: email@example.com"));
    }

    #[test]
    fn rejects_label_ending_with_hyphen() {
        assert!(!is_valid("email@example-.com"));
    }

    #[test]
    fn rejects_numeric_tld_on_named_domain() {
        assert!(!is_valid("email@example.123"));
    }
}
