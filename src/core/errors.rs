//! core::errors
//!
//! The single error type shared by every Stasher component.
//!
//! # Design
//!
//! Every failure the core can produce is one variant of [`StashError`].
//! None of them terminate the process; the CLI layer decides messaging
//! and exit status. Bulk operations collect per-entry failures into
//! [`StashError::Batch`] instead of stopping at the first one.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::lock::LockError;
use crate::ui::prompts::PromptError;

/// What a [`StashError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    /// A filesystem path.
    Path,
    /// A key in the path registry.
    Key,
    /// A stash directory.
    Stash,
    /// An entry in a stash's tracked set.
    Tracked,
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotFoundKind::Path => "path",
            NotFoundKind::Key => "key",
            NotFoundKind::Stash => "stash",
            NotFoundKind::Tracked => "tracked entry",
        };
        f.write_str(s)
    }
}

/// One failed entry inside a bulk operation.
#[derive(Debug)]
pub struct EntryFailure {
    /// Entry name (stash name, tracked filename, registry key).
    pub entry: String,
    /// The path the failing I/O call touched.
    pub path: PathBuf,
    /// The underlying error.
    pub source: std::io::Error,
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' ({}): {}",
            self.entry,
            self.path.display(),
            self.source
        )
    }
}

/// Errors from Stasher operations.
#[derive(Debug, Error)]
pub enum StashError {
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("{kind} '{name}' was not found")]
    NotFound { kind: NotFoundKind, name: String },

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("path '{}' must be a directory, not a file", .0.display())]
    NotADirectory(PathBuf),

    #[error("no current active stash; activate one with: stasher activate <name>")]
    NoActiveStash,

    #[error("no path entries registered; add one with: stasher path add <path>")]
    NoTrackablePaths,

    #[error("stash metadata '{}' is unreadable: {message}", .path.display())]
    Metadata { path: PathBuf, message: String },

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("i/o error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}", format_batch(.failures))]
    Batch { failures: Vec<EntryFailure> },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl StashError {
    pub(crate) fn not_found(kind: NotFoundKind, name: impl Into<String>) -> Self {
        StashError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StashError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the not-found family regardless of what was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StashError::NotFound { .. })
    }
}

fn format_batch(failures: &[EntryFailure]) -> String {
    let noun = if failures.len() == 1 { "entry" } else { "entries" };
    let mut out = format!("{} {} failed:", failures.len(), noun);
    for failure in failures {
        out.push_str(&format!("\n  - {}", failure));
    }
    out
}

/// Result alias used throughout the core.
pub type Result<T, E = StashError> = std::result::Result<T, E>;
