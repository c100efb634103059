//! core::paths
//!
//! Centralized path routing for Stasher storage locations.
//!
//! # Storage Layout
//!
//! All Stasher data is stored under a per-user data root
//! (`<data_dir>/stasher/` by default):
//! - `paths.json` - Path registry
//! - `active.txt` - Active stash pointer
//! - `lock` - Exclusive lock file
//! - `stashes/` - One directory per stash
//! - `stashes/<name>/.stash.json` - Tracked set of a stash
//!
//! **Hard rule:** no code outside this module joins storage file names
//! onto the data root.
//!
//! # Example
//!
//! ```
//! use stasher::core::paths::StasherPaths;
//! use std::path::PathBuf;
//!
//! let paths = StasherPaths::new(PathBuf::from("/data/stasher"));
//!
//! assert_eq!(paths.registry_path(), PathBuf::from("/data/stasher/paths.json"));
//! assert_eq!(paths.stash_dir("dark"), PathBuf::from("/data/stasher/stashes/dark"));
//! ```

use std::path::{Path, PathBuf};

/// Name of the per-stash metadata file.
pub const METADATA_FILE: &str = ".stash.json";

/// Prefix for staging copies written while pushing an entry.
pub const STAGING_PREFIX: &str = ".stash-staging-";

/// Centralized path routing for Stasher storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StasherPaths {
    root: PathBuf,
}

impl StasherPaths {
    /// Create paths rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Default data root: `<dirs::data_dir()>/stasher`.
    ///
    /// Returns `None` when the platform has no user data directory.
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("stasher"))
    }

    /// The data root itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/paths.json`
    pub fn registry_path(&self) -> PathBuf {
        self.root.join("paths.json")
    }

    /// `<root>/active.txt`
    pub fn active_path(&self) -> PathBuf {
        self.root.join("active.txt")
    }

    /// `<root>/lock`
    pub fn lock_path(&self) -> PathBuf {
        self.root.join("lock")
    }

    /// `<root>/stashes`
    pub fn stashes_dir(&self) -> PathBuf {
        self.root.join("stashes")
    }

    /// `<root>/stashes/<name>`
    ///
    /// This is a plain join. Callers handling untrusted names must go
    /// through `StashStore::resolve`, which checks the result stays
    /// directly under the stash root.
    pub fn stash_dir(&self, name: &str) -> PathBuf {
        self.stashes_dir().join(name)
    }

    /// `<root>/stashes/<name>/.stash.json`
    pub fn metadata_path(&self, name: &str) -> PathBuf {
        self.stash_dir(name).join(METADATA_FILE)
    }

    /// Ensure the root and stash directories exist.
    ///
    /// # Errors
    ///
    /// Returns an IO error if directory creation fails.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.stashes_dir())?;
        Ok(())
    }
}

/// True for names Stasher itself writes inside a stash directory.
pub fn is_internal_entry(name: &str) -> bool {
    name == METADATA_FILE
        || name.starts_with(STAGING_PREFIX)
        || name.strip_suffix(".tmp") == Some(METADATA_FILE)
}
