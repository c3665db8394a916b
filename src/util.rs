//! Subject helpers.

use crate::error::{Result, WhoisError};
use std::net::IpAddr;

/// Strips surrounding whitespace and dots.
///
/// Both are trimmed together, so `" . example.com . "` normalizes to
/// `example.com` and a subject made only of dots and blanks is empty.
///
/// # Errors
///
/// Returns [`WhoisError::EmptySubject`] if nothing is left, and
/// [`WhoisError::InvalidSubject`] if a CR or LF remains inside the subject.
///
/// # Example
///
/// ```
/// use whois_resolver::util::normalize_subject;
///
/// assert_eq!(normalize_subject(" example.com. ").unwrap(), "example.com");
/// assert!(normalize_subject(" .. ").is_err());
/// ```
pub fn normalize_subject(subject: &str) -> Result<&str> {
    let trimmed = subject.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.is_empty() {
        return Err(WhoisError::EmptySubject);
    }
    ensure_single_line(trimmed)?;
    Ok(trimmed)
}

/// Rejects subjects that would be sent as more than one query line.
///
/// # Errors
///
/// Returns [`WhoisError::InvalidSubject`] if `subject` contains CR or LF.
pub fn ensure_single_line(subject: &str) -> Result<()> {
    if subject.contains(['\r', '\n']) {
        return Err(WhoisError::InvalidSubject {
            subject: subject.to_string(),
        });
    }
    Ok(())
}

/// Returns the last label of `domain`, cut at the first `/`.
///
/// A domain without dots is returned unchanged (minus any `/` suffix).
#[must_use]
pub fn extract_extension(domain: &str) -> &str {
    let ext = domain.rsplit('.').next().unwrap_or(domain);
    ext.split('/').next().unwrap_or(ext)
}

/// Returns `true` if `subject` is an IPv4 or IPv6 address literal.
#[must_use]
pub fn is_ip_literal(subject: &str) -> bool {
    subject.parse::<IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace_then_dots() {
        assert_eq!(normalize_subject(" example.com. ").unwrap(), "example.com");
        assert_eq!(normalize_subject("\t.example.com..\n").unwrap(), "example.com");
        assert_eq!(normalize_subject("com").unwrap(), "com");
    }

    #[test]
    fn normalize_rejects_blank_subjects() {
        for subject in ["", "   ", ".", "...", " . . ", "\t.\n"] {
            assert!(
                matches!(normalize_subject(subject), Err(WhoisError::EmptySubject)),
                "{subject:?} should be empty"
            );
        }
    }

    #[test]
    fn normalize_keeps_inner_dots() {
        assert_eq!(normalize_subject(" . example.com . ").unwrap(), "example.com");
        assert_eq!(normalize_subject("a..b").unwrap(), "a..b");
    }

    #[test]
    fn normalize_rejects_inner_line_breaks() {
        for subject in ["a.com\r\nfoo", "a.com\nb.com", " a.com\r.net "] {
            assert!(
                matches!(
                    normalize_subject(subject),
                    Err(WhoisError::InvalidSubject { .. })
                ),
                "{subject:?} should be rejected"
            );
        }
        // Trailing line breaks are ordinary whitespace.
        assert_eq!(normalize_subject("example.com\r\n").unwrap(), "example.com");
    }

    #[test]
    fn extension_of_domain() {
        assert_eq!(extract_extension("foo.bar.com"), "com");
        assert_eq!(extract_extension("example.co.uk"), "uk");
    }

    #[test]
    fn extension_of_bare_label() {
        assert_eq!(extract_extension("com"), "com");
    }

    #[test]
    fn extension_cut_at_slash() {
        assert_eq!(extract_extension("xn--p1ai/junk"), "xn--p1ai");
        assert_eq!(extract_extension("example.xn--p1ai/junk/more"), "xn--p1ai");
    }

    #[test]
    fn ip_literals() {
        assert!(is_ip_literal("192.0.2.1"));
        assert!(is_ip_literal("2001:db8::1"));
        assert!(!is_ip_literal("example.com"));
        assert!(!is_ip_literal("192.0.2"));
    }
}
