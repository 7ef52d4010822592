//! URL-safe slugs derived from entity names.

use serde::Serialize;
use std::fmt;

/// A slug: lowercase ASCII letters and digits only.
///
/// Derived by lowercasing the name and dropping every character outside
/// `[a-z0-9]`, so "Dodge/Escape" becomes `dodgeescape` and
/// "Grooming and Style" becomes `groomingandstyle`. A name with no ASCII
/// letter or digit ("Магия") yields an empty slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn from_name(name: &str) -> Self {
        Self(
            name.to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
