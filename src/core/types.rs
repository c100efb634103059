//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`StashName`] - Validated, filesystem-safe stash name
//! - [`PathEntry`] - One `key -> path` pair from the path registry
//! - [`ConflictPolicy`] - Overwrite rule for merge copies
//!
//! # Validation
//!
//! Names are validated at construction time, so a `StashName` can always
//! be joined onto the stash root without escaping it.
//!
//! # Examples
//!
//! ```
//! use stasher::core::types::StashName;
//!
//! let name = StashName::new("my-theme_1").unwrap();
//! assert_eq!(name.as_str(), "my-theme_1");
//!
//! assert!(StashName::new("").is_err());
//! assert!(StashName::new("a/b").is_err());
//! assert!(StashName::new("...").is_err());
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::StashError;

/// A validated stash name.
///
/// Rules:
/// - Surrounding whitespace is trimmed
/// - Cannot be empty
/// - Cannot contain `/`
/// - Cannot consist only of `.` characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StashName(String);

impl StashName {
    /// Create a new validated stash name.
    ///
    /// # Errors
    ///
    /// Returns `StashError::InvalidName` if the name breaks any rule.
    pub fn new(name: impl Into<String>) -> Result<Self, StashError> {
        let raw = name.into();
        let trimmed = raw.trim();
        Self::validate(trimmed).map_err(|reason| StashError::InvalidName {
            name: raw.clone(),
            reason: reason.to_string(),
        })?;
        Ok(Self(trimmed.to_string()))
    }

    fn validate(name: &str) -> Result<(), &'static str> {
        if name.is_empty() {
            return Err("name cannot be empty");
        }
        if name.contains('/') {
            return Err("name cannot contain '/'");
        }
        if name.chars().all(|c| c == '.') {
            return Err("name cannot consist only of dots");
        }
        Ok(())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StashName {
    type Error = StashError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<StashName> for String {
    fn from(name: StashName) -> Self {
        name.0
    }
}

impl AsRef<str> for StashName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StashName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Short name, the final segment of `path`.
    pub key: String,
    /// Absolute directory path.
    pub path: PathBuf,
}

/// What a merge-copy does with a file that already exists at the
/// destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Replace the destination file with the stashed one.
    #[default]
    Overwrite,
    /// Keep the destination file.
    Skip,
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictPolicy::Overwrite => write!(f, "overwrite"),
            ConflictPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Derive the key for a path from its final segment.
///
/// Trailing separators are ignored, so `/home/u/.config/foo/` and
/// `/home/u/.config/foo` both yield `foo`. Returns `None` for paths with
/// no usable final segment (`/`, `..`).
///
/// # Example
///
/// ```
/// use stasher::core::types::key_for_path;
/// use std::path::Path;
///
/// assert_eq!(key_for_path(Path::new("/home/u/.config/foo")).as_deref(), Some("foo"));
/// assert_eq!(key_for_path(Path::new("/")), None);
/// ```
pub fn key_for_path(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
}

/// True if the argument should be read as a literal path rather than a key.
pub fn looks_like_path(arg: &str) -> bool {
    arg.contains(std::path::MAIN_SEPARATOR) || arg.contains('/')
}
