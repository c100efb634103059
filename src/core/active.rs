//! core::active
//!
//! The single-slot pointer naming the current stash, persisted in
//! `active.txt`.
//!
//! # Invariants
//!
//! - The pointer is only ever written with a name that resolved at write time
//! - Every read goes through [`ActiveStashTracker::get_active`], which
//!   reports a pointer to a deleted stash as "none" without rewriting storage

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::core::atomic;
use crate::core::errors::{Result, StashError};
use crate::core::stash::{StashRecord, StashStore};

/// What `status` shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// A stash is active.
    Active(String),
    /// Nothing is active.
    NoActive,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusReport::Active(name) => write!(f, "Current active stash: {}", name),
            StatusReport::NoActive => write!(
                f,
                "No current active stash.\nActivate one by doing: stasher activate <name>"
            ),
        }
    }
}

/// Owner of `active.txt`.
#[derive(Debug, Clone)]
pub struct ActiveStashTracker {
    store: StashStore,
    path: PathBuf,
}

impl ActiveStashTracker {
    /// Create a tracker validating names against `store`.
    pub fn new(store: StashStore) -> Self {
        let path = store.paths().active_path();
        Self { store, path }
    }

    /// The store this tracker resolves against.
    pub fn store(&self) -> &StashStore {
        &self.store
    }

    /// Make `name` the active stash.
    ///
    /// # Errors
    ///
    /// `NotFound` if the stash does not exist; the pointer is left as it was.
    pub fn activate(&self, name: &str) -> Result<StashRecord> {
        let record = self.store.resolve(name)?;
        atomic::write_atomic(&self.path, format!("{}\n", record.name).as_bytes())?;
        info!(stash = %record.name, "activated stash");
        Ok(record)
    }

    /// Empty the pointer.
    pub fn clear(&self) -> Result<()> {
        atomic::write_atomic(&self.path, b"")?;
        debug!("cleared active stash");
        Ok(())
    }

    /// Name of the active stash, or `None` if nothing is active or the
    /// named stash no longer exists.
    pub fn get_active(&self) -> Result<Option<String>> {
        match self.pointer()? {
            Some(name) if self.store.exists(&name) => Ok(Some(name)),
            Some(name) => {
                debug!(stash = %name, "active pointer names a missing stash");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// The active stash, which must exist.
    ///
    /// # Errors
    ///
    /// `NoActiveStash` if nothing is active.
    pub fn active_record(&self) -> Result<StashRecord> {
        let name = self.get_active()?.ok_or(StashError::NoActiveStash)?;
        self.store.resolve(&name)
    }

    /// Display report for the pointer.
    pub fn status(&self) -> Result<StatusReport> {
        Ok(match self.get_active()? {
            Some(name) => StatusReport::Active(name),
            None => StatusReport::NoActive,
        })
    }

    /// Raw pointer contents, without the existence check.
    pub(crate) fn pointer(&self) -> Result<Option<String>> {
        let contents = atomic::read_optional(&self.path)?.unwrap_or_default();
        let name = contents.lines().next().unwrap_or("").trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }
}
