//! Domain error type.
//!
//! Raised when a sheet value cannot be built: a name that is blank or too
//! long, an email without a domain, a skill priced at zero XP per level.
//! Progression outcomes have their own type, [`crate::RuleError`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input for a value object.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A well-formed value that breaks a sheet rule.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl DomainError {
    /// Input could not be turned into a value object.
    ///
    /// # Example
    /// ```ignore
    /// if name.trim().is_empty() {
    ///     return Err(DomainError::validation("Skill name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }
}
