//! path commands - manage the path registry

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{confirm, verbosity, workspace};
use crate::core::registry::{RemoveOutcome, RemoveTarget};
use crate::engine::Context;
use crate::ui::output;
use crate::ui::prompts;

/// Register a directory.
pub fn add(ctx: &Context, path: &Path) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    let entry = ws
        .registry
        .add(path)
        .with_context(|| format!("Failed to add path '{}'", path.display()))?;

    output::success(
        format!("Added '{}' as '{}'", entry.path.display(), entry.key),
        verbosity(ctx),
    );
    Ok(())
}

/// Remove a registered path by path or key, or all of them with `*`.
pub fn remove(ctx: &Context, target: &str) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    let outcome = ws
        .registry
        .remove(&RemoveTarget::parse(target), |message| {
            Ok(prompts::confirm(message, ctx.interactive, ctx.assume_yes)?)
        })
        .with_context(|| format!("Failed to remove path '{}'", target))?;

    match outcome {
        RemoveOutcome::Removed(entries) => {
            for entry in entries {
                output::success(
                    format!("Removed '{}' ({})", entry.key, entry.path.display()),
                    verbosity(ctx),
                );
            }
        }
        RemoveOutcome::Cancelled => output::print("Aborted.", verbosity(ctx)),
    }
    Ok(())
}

/// List registered paths.
pub fn list(ctx: &Context) -> Result<()> {
    let ws = workspace(ctx)?;
    let pairs: Vec<(String, String)> = ws
        .registry
        .list()?
        .map(|e| (e.key, e.path.display().to_string()))
        .collect();

    if pairs.is_empty() {
        output::print(
            "No paths registered. Add one with: stasher path add <path>",
            verbosity(ctx),
        );
    } else {
        output::data(output::format_pairs(&pairs));
    }
    Ok(())
}

/// Remove every registered path after confirmation.
pub fn wipe(ctx: &Context) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    if !confirm(ctx, "Are you sure you want to remove all path entries?")? {
        output::print("Aborted.", verbosity(ctx));
        return Ok(());
    }

    ws.registry.wipe()?;
    output::success("Removed all path entries", verbosity(ctx));
    Ok(())
}
