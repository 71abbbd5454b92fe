//! Sender email addresses
//!
//! Addresses are normalized to Unicode lower case on parse so that
//! allowlist membership is a plain equality check.

use std::fmt;
use thiserror::Error;

/// Why a raw sender string could not be read as an address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address")]
    Empty,

    #[error("malformed address: {0}")]
    Malformed(String),
}

/// A case-normalized email address.
///
/// # Examples
///
/// ```
/// use mail_gate::EmailAddress;
///
/// let addr = EmailAddress::parse("Alice <Alice@Example.COM>").unwrap();
/// assert_eq!(addr.as_str(), "alice@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse a bare address (`a@x.com`) or a display form
    /// (`Alice <a@x.com>`).
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Empty`] for blank input and
    /// [`AddressError::Malformed`] when the address shape is invalid.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let addr = extract_angle(trimmed)?.trim();
        if addr.is_empty() {
            return Err(AddressError::Empty);
        }

        validate(addr)?;
        Ok(Self(addr.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn extract_angle(raw: &str) -> Result<&str, AddressError> {
    match (raw.find('<'), raw.rfind('>')) {
        (Some(start), Some(end)) if start < end && end == raw.len() - 1 => {
            Ok(&raw[start + 1..end])
        }
        (None, None) => Ok(raw),
        _ => Err(AddressError::Malformed(raw.to_string())),
    }
}

fn validate(addr: &str) -> Result<(), AddressError> {
    let malformed = || AddressError::Malformed(addr.to_string());

    if addr
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | ',' | ';'))
    {
        return Err(malformed());
    }

    let (local, domain) = addr.split_once('@').ok_or_else(malformed)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(malformed());
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(malformed());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_address_is_lowercased() {
        let addr = EmailAddress::parse("Trusted@Company.COM").unwrap();
        assert_eq!(addr.as_str(), "trusted@company.com");
    }

    #[test]
    fn non_ascii_address_is_lowercased() {
        let upper = EmailAddress::parse("Élodie@Exemple.FR").unwrap();
        let lower = EmailAddress::parse("élodie@exemple.fr").unwrap();
        assert_eq!(upper.as_str(), "élodie@exemple.fr");
        assert_eq!(upper, lower);
    }

    #[test]
    fn display_form() {
        let addr = EmailAddress::parse("Alice Smith <alice@example.com>").unwrap();
        assert_eq!(addr.as_str(), "alice@example.com");
    }

    #[test]
    fn surrounding_whitespace_trimmed() {
        let addr = EmailAddress::parse("  bob@example.com \n").unwrap();
        assert_eq!(addr.as_str(), "bob@example.com");
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(EmailAddress::parse(""), Err(AddressError::Empty));
        assert_eq!(EmailAddress::parse("   "), Err(AddressError::Empty));
        assert_eq!(EmailAddress::parse("Nobody <>"), Err(AddressError::Empty));
    }

    #[test]
    fn malformed_rejected() {
        for raw in [
            "no-at-sign",
            "@example.com",
            "alice@",
            "a@b@c.com",
            "alice@.example.com",
            "alice@example.com.",
            "alice@exa..mple.com",
            "alice smith@example.com",
            "Alice <alice@example.com",
            "a@x.com, b@y.com",
            "<a@x.com> trailing",
        ] {
            assert!(
                matches!(EmailAddress::parse(raw), Err(AddressError::Malformed(_))),
                "{raw} should be malformed"
            );
        }
    }

    #[test]
    fn display_matches_as_str() {
        let addr = EmailAddress::parse("A@X.COM").unwrap();
        assert_eq!(format!("{addr}"), "a@x.com");
    }
}
