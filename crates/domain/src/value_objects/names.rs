//! Validated name newtypes for sheet entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty (except Description)
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for name fields (UserName, StatisticName, SkillName)
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for statistic abbreviations ("INT", "WILL")
const MAX_SHORT_NAME_LENGTH: usize = 16;

/// Maximum length for description fields
const MAX_DESCRIPTION_LENGTH: usize = 5000;

fn validated(kind: &str, raw: String, max: usize) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{kind} cannot be empty")));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{kind} cannot exceed {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

// ============================================================================
// UserName
// ============================================================================

/// A validated account display name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated("User name", name.into(), MAX_NAME_LENGTH).map(Self)
    }
}

string_newtype_impls!(UserName);

// ============================================================================
// StatisticName
// ============================================================================

/// A validated statistic name such as "Intelligence"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatisticName(String);

impl StatisticName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated("Statistic name", name.into(), MAX_NAME_LENGTH).map(Self)
    }
}

string_newtype_impls!(StatisticName);

// ============================================================================
// ShortName
// ============================================================================

/// A statistic abbreviation such as "INT". Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortName(String);

impl ShortName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated("Short name", name.into(), MAX_SHORT_NAME_LENGTH).map(Self)
    }
}

string_newtype_impls!(ShortName);

// ============================================================================
// SkillName
// ============================================================================

/// A validated skill name such as "Monster Lore"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName(String);

impl SkillName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated("Skill name", name.into(), MAX_NAME_LENGTH).map(Self)
    }
}

string_newtype_impls!(SkillName);

// ============================================================================
// Description
// ============================================================================

/// Free-form description text. May be empty; trimmed; <=5000 chars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(DomainError::validation(format!(
                "Description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

string_newtype_impls!(Description);
