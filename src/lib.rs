//! Stasher - named snapshots of configuration directories
//!
//! Stasher keeps copies of user-chosen paths (typically `~/.config/*`
//! directories) in named stashes and copies them back on demand, so a whole
//! desktop theme can be switched with one command.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, prints results)
//! - [`engine`] - Workspace wiring, push/apply copies and reload hooks
//! - [`core`] - Domain types, storage and the stash state machine
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! Stasher maintains the following invariants:
//!
//! 1. A stash exists exactly when its directory exists
//! 2. The active pointer never reports a stash that no longer exists
//! 3. Storage files are replaced atomically, never half-written
//! 4. Bulk operations attempt every entry and report each failure

pub mod cli;
pub mod core;
pub mod engine;
pub mod ui;
