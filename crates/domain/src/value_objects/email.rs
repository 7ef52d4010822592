//! Account email address.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

const MAX_EMAIL_LENGTH: usize = 254;

/// A normalized email address (trimmed, lowercased).
///
/// Only the shape is checked: exactly one `@` with something on both sides
/// and no whitespace. Uniqueness is a store constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let normalized = raw.trim().to_lowercase();
        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(DomainError::validation("Email address is too long"));
        }
        let mut parts = normalized.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::validation(format!(
                "'{normalized}' is not a valid email address"
            )));
        };
        if local.is_empty() || domain.is_empty() || normalized.contains(char::is_whitespace) {
            return Err(DomainError::validation(format!(
                "'{normalized}' is not a valid email address"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}
