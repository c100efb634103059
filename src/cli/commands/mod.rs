//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration and opens the [`Workspace`]
//! 2. Takes the storage lock if it mutates anything
//! 3. Calls core or engine operations
//! 4. Formats and displays output
//!
//! Handlers do NOT touch storage files directly.

mod active;
mod completion;
mod config_cmd;
mod path;
mod snapshot;
mod stash;
mod track;

// Re-export command functions for testing and direct invocation
pub use active::{activate, clear, status};
pub use completion::completion;
pub use config_cmd::{init as config_init, show as config_show};
pub use path::{add as path_add, list as path_list, remove as path_remove, wipe as path_wipe};
pub use snapshot::{apply, push, reload};
pub use stash::{create, delete, list, tree, wipe};
pub use track::{track, tracked, untrack};

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, ConfigAction, PathAction};
use crate::core::config::Config;
use crate::engine::{Context, Workspace};
use crate::ui::output::Verbosity;
use crate::ui::prompts;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        // Stash lifecycle
        Command::Create { name, from_paths } => stash::create(ctx, &name, from_paths),
        Command::Delete { name } => stash::delete(ctx, &name),
        Command::List => stash::list(ctx),
        Command::Tree { name } => stash::tree(ctx, &name),
        Command::Wipe => stash::wipe(ctx),

        // Active pointer
        Command::Activate { name } => active::activate(ctx, &name),
        Command::Clear => active::clear(ctx),
        Command::Status => active::status(ctx),

        // Tracking
        Command::Track { path } => track::track(ctx, &path),
        Command::Untrack { target } => track::untrack(ctx, &target),
        Command::Tracked => track::tracked(ctx),

        // Snapshots
        Command::Push => snapshot::push(ctx),
        Command::Apply {
            name,
            skip_existing,
            reload,
        } => snapshot::apply(ctx, &name, skip_existing, reload),
        Command::Reload => snapshot::reload(ctx),

        // Setup
        Command::Path { action } => match action {
            PathAction::Add { path } => path::add(ctx, &path),
            PathAction::Remove { target } => path::remove(ctx, &target),
            PathAction::List => path::list(ctx),
            PathAction::Wipe => path::wipe(ctx),
        },
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Init { force } => config_cmd::init(ctx, force),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load configuration and open the workspace it points at.
fn open(ctx: &Context) -> Result<(Config, Workspace)> {
    let config = Config::load().context("Failed to load configuration")?;
    let ws = Workspace::open(ctx, &config).context("Failed to open stash storage")?;
    Ok((config, ws))
}

/// Open the workspace, discarding the config.
fn workspace(ctx: &Context) -> Result<Workspace> {
    open(ctx).map(|(_, ws)| ws)
}

fn verbosity(ctx: &Context) -> Verbosity {
    Verbosity::from_flags(ctx.quiet, ctx.debug)
}

/// Ask before an irreversible bulk operation.
fn confirm(ctx: &Context, message: &str) -> Result<bool> {
    Ok(prompts::confirm(message, ctx.interactive, ctx.assume_yes)?)
}
