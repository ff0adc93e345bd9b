//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for values the Lens API treats specially.

use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

/// Storage key for uploaded bytes
///
/// A random UUID v4 followed by the lowercased extension of the user-visible
/// file name, e.g. `1f0e...c3.fcstd`. Never derived from file content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UniqueFileName(String);

impl UniqueFileName {
    /// Generates a fresh name for a file with the given extension
    ///
    /// A leading dot on `extension` is ignored. An empty extension yields a
    /// bare UUID.
    #[must_use]
    pub fn generate(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_lowercase();
        let id = Uuid::new_v4();
        if ext.is_empty() {
            Self(id.to_string())
        } else {
            Self(format!("{id}.{ext}"))
        }
    }

    /// Generates a fresh name for the file at `path`, keeping its extension
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::generate(ext)
    }

    /// Wraps an existing storage key
    ///
    /// # Errors
    /// Returns error if the name is empty or contains path separators
    pub fn new(name: String) -> Result<Self, DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidUniqueName(
                "Unique file name cannot be empty".to_string(),
            ));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(DomainError::InvalidUniqueName(format!(
                "Unique file name contains a path separator: {name}"
            )));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidUniqueName(format!(
                "Unique file name contains whitespace: {name}"
            )));
        }
        Ok(Self(name))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UniqueFileName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UniqueFileName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for UniqueFileName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UniqueFileName> for String {
    fn from(name: UniqueFileName) -> Self {
        name.0
    }
}

impl AsRef<str> for UniqueFileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
