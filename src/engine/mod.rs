//! engine
//!
//! Wires the core components together and runs the operations that move
//! files: push, apply, seeded creation and reload hooks.
//!
//! # Architecture
//!
//! A [`Workspace`] is opened once per invocation from the global
//! [`Context`] and the loaded [`Config`]. It owns one instance of every
//! core component, all rooted at the same data directory:
//!
//! ```text
//! PathRegistry      StashStore
//!      |                |
//!      |         ActiveStashTracker
//!      |                |
//!      |        TrackedSetManager
//!      \________________/
//!              |
//!        SnapshotEngine
//! ```
//!
//! # Example
//!
//! ```ignore
//! use stasher::engine::{Context, Workspace};
//!
//! let ws = Workspace::open(&ctx, &config)?;
//! let _lock = ws.lock()?;
//! ws.snapshot().push()?.into_result()?;
//! ```

pub mod copy;
pub mod hooks;
pub mod snapshot;

pub use copy::CopyOptions;
pub use hooks::{reload_dependents, HookOutcome, HookStatus};
pub use snapshot::{Applied, ApplyReport, PushReport, SnapshotEngine};

use std::path::PathBuf;

use tracing::debug;

use crate::core::active::ActiveStashTracker;
use crate::core::config::Config;
use crate::core::errors::{Result, StashError};
use crate::core::lock::StoreLock;
use crate::core::paths::StasherPaths;
use crate::core::registry::PathRegistry;
use crate::core::stash::StashStore;
use crate::core::tracked::TrackedSetManager;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone)]
pub struct Context {
    /// Data root override (`--data-dir`).
    pub data_dir: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Interactive mode enabled.
    pub interactive: bool,
    /// Answer yes to confirmations (`--yes`).
    pub assume_yes: bool,
    /// `--no-follow-symlinks` was passed.
    pub no_follow_symlinks: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            data_dir: None,
            debug: false,
            quiet: false,
            interactive: true,
            assume_yes: false,
            no_follow_symlinks: false,
        }
    }
}

/// Every component, rooted at one data directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub paths: StasherPaths,
    pub registry: PathRegistry,
    pub store: StashStore,
    pub active: ActiveStashTracker,
    pub tracked: TrackedSetManager,
    copy_options: CopyOptions,
}

impl Workspace {
    /// Resolve the data root and build the components.
    ///
    /// The root is `--data-dir`, else `STASHER_DATA_DIR`, else the config
    /// file, else the platform default. Storage directories are created if
    /// missing.
    pub fn open(ctx: &Context, config: &Config) -> Result<Self> {
        let root = match &ctx.data_dir {
            Some(dir) => dir.clone(),
            None => config.data_dir()?,
        };
        let paths = StasherPaths::new(root);
        paths
            .ensure_dirs()
            .map_err(|e| StashError::io(paths.root(), e))?;
        debug!(root = %paths.root().display(), "opened workspace");

        let copy_options = CopyOptions {
            follow_symlinks: config.follow_symlinks() && !ctx.no_follow_symlinks,
            conflict: config.apply_conflict(),
        };
        Ok(Self::with_options(paths, copy_options))
    }

    /// Build the components over existing paths.
    pub fn with_options(paths: StasherPaths, copy_options: CopyOptions) -> Self {
        let registry = PathRegistry::new(&paths);
        let store = StashStore::new(&paths);
        let active = ActiveStashTracker::new(store.clone());
        let tracked = TrackedSetManager::new(active.clone());
        Self {
            paths,
            registry,
            store,
            active,
            tracked,
            copy_options,
        }
    }

    /// The snapshot engine over this workspace.
    pub fn snapshot(&self) -> SnapshotEngine {
        SnapshotEngine::new(
            self.registry.clone(),
            self.tracked.clone(),
            self.copy_options,
        )
    }

    /// Copy options resolved from config and flags.
    pub fn copy_options(&self) -> &CopyOptions {
        &self.copy_options
    }

    /// Take the exclusive storage lock for a mutating operation.
    pub fn lock(&self) -> Result<StoreLock> {
        Ok(StoreLock::acquire(&self.paths)?)
    }
}
