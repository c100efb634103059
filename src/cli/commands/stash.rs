//! stash commands - create, delete, list, tree, wipe

use anyhow::{Context as _, Result};

use super::{confirm, verbosity, workspace};
use crate::core::tree::tree as build_tree;
use crate::engine::Context;
use crate::ui::output;

/// Create a stash, optionally seeded from every registered path.
pub fn create(ctx: &Context, name: &str, from_paths: bool) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    let record = if from_paths {
        ws.snapshot().create_seeded(name)
    } else {
        ws.store.create(name)
    }
    .with_context(|| format!("Failed to create stash '{}'", name))?;

    output::success(
        format!("Created stash '{}'", record.name),
        verbosity(ctx),
    );
    Ok(())
}

/// Delete a stash.
pub fn delete(ctx: &Context, name: &str) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    ws.store
        .delete(name, &ws.active)
        .with_context(|| format!("Failed to delete stash '{}'", name))?;

    output::success(format!("Deleted stash '{}'", name), verbosity(ctx));
    Ok(())
}

/// List stash names, marking the active one.
pub fn list(ctx: &Context) -> Result<()> {
    let ws = workspace(ctx)?;
    let active = ws.active.get_active()?;

    let mut any = false;
    for name in ws.store.list()? {
        any = true;
        let marker = if active.as_deref() == Some(name.as_str()) {
            "* "
        } else {
            "  "
        };
        output::data(format!("{}{}", marker, name));
    }
    if !any {
        output::print("No stashes yet. Create one with: stasher create <name>", verbosity(ctx));
    }
    Ok(())
}

/// Print the contents of a stash.
pub fn tree(ctx: &Context, name: &str) -> Result<()> {
    let ws = workspace(ctx)?;
    let node = build_tree(&ws.store, name)?;
    output::data(node.render().trim_end());
    Ok(())
}

/// Delete every stash after confirmation.
pub fn wipe(ctx: &Context) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    if !confirm(ctx, "Are you sure you want to delete every stash?")? {
        output::print("Aborted.", verbosity(ctx));
        return Ok(());
    }

    let removed = ws
        .store
        .wipe(&ws.active)?
        .into_result()
        .context("Some stashes could not be removed")?;

    output::success(
        format!("Removed {} stash(es)", removed.len()),
        verbosity(ctx),
    );
    Ok(())
}
