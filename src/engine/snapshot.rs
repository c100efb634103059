//! engine::snapshot
//!
//! Moving files between tracked locations and stash storage.
//!
//! # Operations
//!
//! - [`SnapshotEngine::push`] - Copy every tracked source into the active stash
//! - [`SnapshotEngine::apply`] - Restore a stash's entries to their locations
//! - [`SnapshotEngine::create_seeded`] - Create a stash tracking every
//!   registered path, then push it
//!
//! # Failure model
//!
//! Entries are independent. A failing entry is recorded with its path and
//! I/O error and the remaining entries are still attempted. Push replaces
//! an entry only after its staging copy completed, so each stored copy is
//! either fully refreshed or left as it was. Apply has no rollback.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::errors::{EntryFailure, Result, StashError};
use crate::core::paths::STAGING_PREFIX;
use crate::core::registry::PathRegistry;
use crate::core::stash::{stash_entries, StashRecord, TrackedEntry};
use crate::core::tracked::TrackedSetManager;
use crate::core::types::ConflictPolicy;
use crate::engine::copy::{copy_entry, remove_path, CopyOptions};

/// Outcome of a push.
#[derive(Debug)]
pub struct PushReport {
    /// Stash that was pushed into.
    pub stash: String,
    /// Filenames refreshed.
    pub pushed: Vec<String>,
    /// Entries that could not be copied.
    pub failures: Vec<EntryFailure>,
}

impl PushReport {
    /// Convert into an error if any entry failed.
    pub fn into_result(self) -> Result<Self> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(StashError::Batch {
                failures: self.failures,
            })
        }
    }
}

/// One entry restored by apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub entry: String,
    pub destination: PathBuf,
}

/// Outcome of an apply.
#[derive(Debug)]
pub struct ApplyReport {
    /// Stash that was applied.
    pub stash: String,
    /// Entries copied out.
    pub applied: Vec<Applied>,
    /// Entries with no tracked path and no matching registry key.
    pub skipped: Vec<String>,
    /// Entries whose copy failed partway.
    pub failures: Vec<EntryFailure>,
}

impl ApplyReport {
    /// Convert into an error if any entry failed.
    pub fn into_result(self) -> Result<Self> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(StashError::Batch {
                failures: self.failures,
            })
        }
    }
}

/// Push, apply and seeded creation.
#[derive(Debug, Clone)]
pub struct SnapshotEngine {
    registry: PathRegistry,
    tracked: TrackedSetManager,
    options: CopyOptions,
}

impl SnapshotEngine {
    pub fn new(registry: PathRegistry, tracked: TrackedSetManager, options: CopyOptions) -> Self {
        Self {
            registry,
            tracked,
            options,
        }
    }

    /// Copy options in effect.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Copy every tracked source of the active stash into it.
    ///
    /// # Errors
    ///
    /// `NoActiveStash` if nothing is active. Per-entry failures are in the
    /// report, not here.
    pub fn push(&self) -> Result<PushReport> {
        let record = self.tracked.active().active_record()?;
        self.push_record(&record)
    }

    fn push_record(&self, record: &StashRecord) -> Result<PushReport> {
        let set = record.tracked()?;
        let mut report = PushReport {
            stash: record.name.clone(),
            pushed: Vec::new(),
            failures: Vec::new(),
        };

        for entry in set.entries() {
            match self.push_entry(record, entry) {
                Ok(()) => {
                    debug!(stash = %record.name, filename = %entry.filename, "pushed entry");
                    report.pushed.push(entry.filename.clone());
                }
                Err(source) => {
                    warn!(
                        stash = %record.name,
                        path = %entry.path.display(),
                        error = %source,
                        "could not push entry"
                    );
                    report.failures.push(EntryFailure {
                        entry: entry.filename.clone(),
                        path: entry.path.clone(),
                        source,
                    });
                }
            }
        }

        info!(
            stash = %record.name,
            pushed = report.pushed.len(),
            failed = report.failures.len(),
            "push finished"
        );
        Ok(report)
    }

    fn push_entry(&self, record: &StashRecord, entry: &TrackedEntry) -> io::Result<()> {
        let staging = record
            .directory
            .join(format!("{}{}", STAGING_PREFIX, entry.filename));
        let dest = record.directory.join(&entry.filename);
        let opts = self.options.with_conflict(ConflictPolicy::Overwrite);

        remove_path(&staging)?;
        if let Err(e) = copy_entry(&entry.path, &staging, &opts) {
            let _ = remove_path(&staging);
            return Err(e);
        }
        remove_path(&dest)?;
        fs::rename(&staging, &dest)
    }

    /// Restore the entries of stash `name`.
    ///
    /// Each top-level entry goes to its tracked source path, else to the
    /// registry path with the same key; anything else is skipped. The stash
    /// does not need to be active.
    ///
    /// # Errors
    ///
    /// `NotFound` if the stash does not exist.
    pub fn apply(&self, name: &str, conflict: ConflictPolicy) -> Result<ApplyReport> {
        let record = self.tracked.active().store().resolve(name)?;
        let set = record.tracked()?;
        let opts = self.options.with_conflict(conflict);

        let mut report = ApplyReport {
            stash: record.name.clone(),
            applied: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        };

        for (entry, source) in stash_entries(&record.directory)? {
            let destination = match set.get(&entry) {
                Some(tracked) => Some(tracked.path.clone()),
                None => self.registry.get(&entry)?.map(|e| e.path),
            };
            let Some(destination) = destination else {
                debug!(stash = %record.name, entry = %entry, "no destination for entry");
                report.skipped.push(entry);
                continue;
            };

            match copy_entry(&source, &destination, &opts) {
                Ok(()) => report.applied.push(Applied { entry, destination }),
                Err(source) => {
                    warn!(
                        stash = %record.name,
                        path = %destination.display(),
                        error = %source,
                        "could not apply entry"
                    );
                    report.failures.push(EntryFailure {
                        entry,
                        path: destination,
                        source,
                    });
                }
            }
        }

        info!(
            stash = %record.name,
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "apply finished"
        );
        Ok(report)
    }

    /// Create `name` tracking every registered path, then push it.
    ///
    /// The new stash is removed again if tracking or copying fails.
    ///
    /// # Errors
    ///
    /// - `NoTrackablePaths` if the registry is empty
    /// - Any `create` error
    /// - `Batch` if some registered paths could not be copied
    pub fn create_seeded(&self, name: &str) -> Result<StashRecord> {
        if self.registry.is_empty()? {
            return Err(StashError::NoTrackablePaths);
        }

        let store = self.tracked.active().store();
        let record = store.create(name)?;

        let seeded = self.seed(&record);
        match seeded {
            Ok(()) => {
                info!(stash = %record.name, "created seeded stash");
                Ok(record)
            }
            Err(e) => {
                store.discard(&record);
                Err(e)
            }
        }
    }

    fn seed(&self, record: &StashRecord) -> Result<()> {
        for entry in self.registry.list()? {
            self.tracked.track_in(record, &entry.path)?;
        }
        self.push_record(record)?.into_result().map(|_| ())
    }
}
