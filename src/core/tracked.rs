//! core::tracked
//!
//! Membership of the active stash: which source paths it snapshots.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::core::active::ActiveStashTracker;
use crate::core::errors::{NotFoundKind, Result, StashError};
use crate::core::registry::absolutize;
use crate::core::stash::{InsertOutcome, StashRecord, TrackedEntry};

/// Result of a `track` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Newly tracked.
    Tracked(TrackedEntry),
    /// The path was already tracked; nothing changed.
    AlreadyTracked(TrackedEntry),
}

/// Result of an `untrack` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Untracked {
    /// The removed entry.
    pub entry: TrackedEntry,
    /// Whether a stored copy was deleted along with it.
    pub removed_copy: bool,
}

/// Mutates the tracked set of whichever stash is active.
#[derive(Debug, Clone)]
pub struct TrackedSetManager {
    active: ActiveStashTracker,
}

impl TrackedSetManager {
    pub fn new(active: ActiveStashTracker) -> Self {
        Self { active }
    }

    /// The pointer this manager follows.
    pub fn active(&self) -> &ActiveStashTracker {
        &self.active
    }

    /// Add `path` to the active stash.
    ///
    /// # Errors
    ///
    /// - `NoActiveStash` if nothing is active
    /// - `NotFound` if the path does not exist
    /// - `AlreadyExists` if another path already uses its filename
    pub fn track(&self, path: &Path) -> Result<TrackOutcome> {
        let record = self.active.active_record()?;
        self.track_in(&record, path)
    }

    /// Add `path` to a specific stash.
    pub(crate) fn track_in(&self, record: &StashRecord, path: &Path) -> Result<TrackOutcome> {
        let path = absolutize(path)?;
        if fs::symlink_metadata(&path).is_err() {
            return Err(StashError::not_found(
                NotFoundKind::Path,
                path.display().to_string(),
            ));
        }

        let mut set = record.tracked()?;
        match set.insert(path.clone())? {
            InsertOutcome::AlreadyTracked(entry) => Ok(TrackOutcome::AlreadyTracked(entry)),
            InsertOutcome::Inserted => {
                record.save_tracked(&set)?;
                let entry = set.find_path(&path).cloned().ok_or_else(|| {
                    StashError::not_found(NotFoundKind::Tracked, path.display().to_string())
                })?;
                info!(stash = %record.name, filename = %entry.filename, "tracked path");
                Ok(TrackOutcome::Tracked(entry))
            }
        }
    }

    /// Remove the entry matching a tracked filename or source path, and the
    /// stored copy under that filename if one was pushed.
    ///
    /// # Errors
    ///
    /// - `NoActiveStash` if nothing is active
    /// - `NotFound` if neither a filename nor a path matches
    pub fn untrack(&self, arg: &str) -> Result<Untracked> {
        let record = self.active.active_record()?;
        let mut set = record.tracked()?;

        let entry = set
            .remove(arg)?
            .ok_or_else(|| StashError::not_found(NotFoundKind::Tracked, arg))?;
        record.save_tracked(&set)?;

        let copy = record.directory.join(&entry.filename);
        let removed_copy = match fs::symlink_metadata(&copy) {
            Ok(meta) if meta.is_dir() => {
                fs::remove_dir_all(&copy).map_err(|e| StashError::io(&copy, e))?;
                true
            }
            Ok(_) => {
                fs::remove_file(&copy).map_err(|e| StashError::io(&copy, e))?;
                true
            }
            Err(_) => false,
        };

        info!(stash = %record.name, filename = %entry.filename, removed_copy, "untracked path");
        Ok(Untracked {
            entry,
            removed_copy,
        })
    }

    /// Entries of the active stash in insertion order.
    ///
    /// # Errors
    ///
    /// `NoActiveStash` if nothing is active.
    pub fn list_tracked(&self) -> Result<std::vec::IntoIter<TrackedEntry>> {
        let record = self.active.active_record()?;
        Ok(record.tracked()?.entries().to_vec().into_iter())
    }
}
