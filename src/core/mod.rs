//! core
//!
//! Domain types, storage, and the stash state machine.
//!
//! # Modules
//!
//! - [`types`] - Strong types: StashName, PathEntry, ConflictPolicy
//! - [`errors`] - The shared error enum
//! - [`paths`] - Centralized path routing for Stasher storage
//! - [`atomic`] - Atomic file writes
//! - [`config`] - Configuration schema and loading
//! - [`lock`] - Exclusive storage lock
//! - [`registry`] - The path registry
//! - [`stash`] - Stash directory lifecycle and tracked-set metadata
//! - [`active`] - The active stash pointer
//! - [`tracked`] - Tracking paths in the active stash
//! - [`tree`] - Directory listing for display
//!
//! # Design Principles
//!
//! - Every component owns exactly one piece of storage
//! - Components talk through lookups, never through each other's files
//! - Nothing here prints or exits; errors go back to the caller

pub mod active;
pub mod atomic;
pub mod config;
pub mod errors;
pub mod lock;
pub mod paths;
pub mod registry;
pub mod stash;
pub mod tracked;
pub mod tree;
pub mod types;
