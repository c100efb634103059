//! core::stash
//!
//! Lifecycle of named stash directories under `<root>/stashes/`.
//!
//! # Invariants
//!
//! - A stash exists exactly when its directory exists
//! - Every name reaching the filesystem passes [`StashStore::resolve`],
//!   which rejects anything that is not a direct child of the stash root
//! - Deleting the active stash clears the active pointer
//!
//! # Modules
//!
//! - [`metadata`] - The per-stash tracked set (`.stash.json`)

pub mod metadata;

pub use metadata::{InsertOutcome, TrackedEntry, TrackedSet};

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::active::ActiveStashTracker;
use crate::core::errors::{EntryFailure, NotFoundKind, Result, StashError};
use crate::core::paths::{StasherPaths, METADATA_FILE};
use crate::core::types::StashName;

/// A stash that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashRecord {
    /// The stash name.
    pub name: String,
    /// `<root>/stashes/<name>`
    pub directory: PathBuf,
}

impl StashRecord {
    /// `<directory>/.stash.json`
    pub fn metadata_path(&self) -> PathBuf {
        self.directory.join(METADATA_FILE)
    }

    /// Load this stash's tracked set.
    pub fn tracked(&self) -> Result<TrackedSet> {
        TrackedSet::load(&self.metadata_path())
    }

    /// Persist this stash's tracked set.
    pub fn save_tracked(&self, set: &TrackedSet) -> Result<()> {
        set.save(&self.metadata_path())
    }
}

/// Outcome of wiping every stash.
#[derive(Debug, Default)]
pub struct WipeReport {
    /// Stashes removed.
    pub removed: Vec<String>,
    /// Stashes that could not be removed.
    pub failures: Vec<EntryFailure>,
}

impl WipeReport {
    /// Convert into an error if anything failed.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.failures.is_empty() {
            Ok(self.removed)
        } else {
            Err(StashError::Batch {
                failures: self.failures,
            })
        }
    }
}

/// Owner of the stash directory tree.
#[derive(Debug, Clone)]
pub struct StashStore {
    paths: StasherPaths,
}

impl StashStore {
    /// Create a store rooted at `<root>/stashes`.
    pub fn new(paths: &StasherPaths) -> Self {
        Self {
            paths: paths.clone(),
        }
    }

    /// Storage paths this store was built with.
    pub fn paths(&self) -> &StasherPaths {
        &self.paths
    }

    /// Create an empty stash with an empty tracked set.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the name fails validation
    /// - `AlreadyExists` if a stash with this name exists
    pub fn create(&self, name: &str) -> Result<StashRecord> {
        let name = StashName::new(name)?;
        let stashes_dir = self.paths.stashes_dir();
        fs::create_dir_all(&stashes_dir).map_err(|e| StashError::io(&stashes_dir, e))?;

        let directory = self.paths.stash_dir(name.as_str());
        match fs::create_dir(&directory) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StashError::AlreadyExists(name.to_string()));
            }
            Err(e) => return Err(StashError::io(&directory, e)),
        }

        let record = StashRecord {
            name: name.to_string(),
            directory,
        };
        if let Err(e) = record.save_tracked(&TrackedSet::new()) {
            let _ = fs::remove_dir_all(&record.directory);
            return Err(e);
        }

        info!(stash = %record.name, "created stash");
        Ok(record)
    }

    /// Delete a stash and everything in it.
    ///
    /// Clears the active pointer if it named this stash.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the stash does not exist
    /// - `Io` if recursive removal fails partway
    pub fn delete(&self, name: &str, active: &ActiveStashTracker) -> Result<()> {
        self.delete_with(name, active, |dir| fs::remove_dir_all(dir))
    }

    fn delete_with<F>(&self, name: &str, active: &ActiveStashTracker, remove: F) -> Result<()>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let record = self.resolve(name)?;
        remove(&record.directory).map_err(|e| StashError::io(&record.directory, e))?;
        info!(stash = %record.name, "deleted stash");

        if active.pointer()?.as_deref() == Some(record.name.as_str()) {
            active.clear()?;
        }
        Ok(())
    }

    /// Names of all stashes, sorted. Re-reads the directory on every call.
    pub fn list(&self) -> Result<std::vec::IntoIter<String>> {
        let stashes_dir = self.paths.stashes_dir();
        let read = match fs::read_dir(&stashes_dir) {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new().into_iter())
            }
            Err(e) => return Err(StashError::io(&stashes_dir, e)),
        };

        let mut names = Vec::new();
        for entry in read {
            let entry = entry.map_err(|e| StashError::io(&stashes_dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(name = ?raw, "skipping stash with non-UTF-8 name"),
            }
        }
        names.sort();
        Ok(names.into_iter())
    }

    /// Delete every stash, continuing past failures.
    ///
    /// Clears the active pointer if its stash was removed.
    pub fn wipe(&self, active: &ActiveStashTracker) -> Result<WipeReport> {
        self.wipe_with(active, |dir| fs::remove_dir_all(dir))
    }

    fn wipe_with<F>(&self, active: &ActiveStashTracker, mut remove: F) -> Result<WipeReport>
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        let pointer = active.pointer()?;
        let mut report = WipeReport::default();

        for name in self.list()? {
            let directory = self.paths.stash_dir(&name);
            match remove(&directory) {
                Ok(()) => {
                    debug!(stash = %name, "removed stash");
                    report.removed.push(name);
                }
                Err(source) => {
                    warn!(stash = %name, error = %source, "could not remove stash");
                    report.failures.push(EntryFailure {
                        entry: name,
                        path: directory,
                        source,
                    });
                }
            }
        }

        if let Some(current) = pointer {
            if report.removed.contains(&current) {
                active.clear()?;
            }
        }

        info!(
            removed = report.removed.len(),
            failed = report.failures.len(),
            "wiped stashes"
        );
        Ok(report)
    }

    /// Look up an existing stash by name.
    ///
    /// Surrounding whitespace is trimmed, as on creation. The joined path
    /// must exist, be a directory, and sit directly under the stash root, so
    /// crafted names such as `../../etc` never resolve.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for anything else.
    pub fn resolve(&self, name: &str) -> Result<StashRecord> {
        let name = name.trim();
        let stashes_dir = self.paths.stashes_dir();
        let directory = stashes_dir.join(name);

        let direct_child = !name.is_empty()
            && directory.parent() == Some(stashes_dir.as_path())
            && directory.file_name() == Some(OsStr::new(name));

        if !direct_child || !directory.is_dir() {
            return Err(StashError::not_found(NotFoundKind::Stash, name));
        }

        Ok(StashRecord {
            name: name.to_string(),
            directory,
        })
    }

    /// True if `name` resolves.
    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Remove a stash directory without touching the active pointer.
    ///
    /// Used to roll back a stash that was never handed to the caller.
    pub(crate) fn discard(&self, record: &StashRecord) {
        if let Err(e) = fs::remove_dir_all(&record.directory) {
            warn!(stash = %record.name, error = %e, "could not discard stash");
        }
    }
}

/// List the top-level entries of a stash directory, sorted, skipping the
/// metadata file and staging leftovers.
pub fn stash_entries(directory: &Path) -> Result<Vec<(String, PathBuf)>> {
    let read = fs::read_dir(directory).map_err(|e| StashError::io(directory, e))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| StashError::io(directory, e))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if crate::core::paths::is_internal_entry(&name) {
            continue;
        }
        entries.push((name, entry.path()));
    }
    entries.sort();
    Ok(entries)
}
