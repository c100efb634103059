//! active commands - activate, clear, status

use anyhow::{Context as _, Result};

use super::{verbosity, workspace};
use crate::engine::Context;
use crate::ui::output;

/// Make a stash active.
pub fn activate(ctx: &Context, name: &str) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    let record = ws
        .active
        .activate(name)
        .with_context(|| format!("Failed to activate stash '{}'", name))?;

    output::success(format!("Activated stash '{}'", record.name), verbosity(ctx));
    Ok(())
}

/// Clear the active pointer.
pub fn clear(ctx: &Context) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    ws.active.clear()?;

    output::success("Cleared active stash", verbosity(ctx));
    Ok(())
}

/// Show the active stash.
pub fn status(ctx: &Context) -> Result<()> {
    let ws = workspace(ctx)?;
    output::data(ws.active.status()?);
    Ok(())
}
