//! cli
//!
//! Command-line interface layer for Stasher.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that call [`crate::core`] and [`crate::engine`]. Handlers own
//! all printing; the layers below only return values and errors.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::Result;

use crate::engine;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = engine::Context {
        data_dir: cli.data_dir.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        interactive: cli.interactive(),
        assume_yes: cli.yes,
        no_follow_symlinks: cli.no_follow_symlinks,
    };

    commands::dispatch(cli.command, &ctx)
}
