//! track commands - track, untrack, tracked

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{verbosity, workspace};
use crate::core::tracked::TrackOutcome;
use crate::engine::Context;
use crate::ui::output;

/// Track a path in the active stash.
pub fn track(ctx: &Context, path: &Path) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    let outcome = ws
        .tracked
        .track(path)
        .with_context(|| format!("Failed to track '{}'", path.display()))?;

    match outcome {
        TrackOutcome::Tracked(entry) => output::success(
            format!("Tracking '{}' as '{}'", entry.path.display(), entry.filename),
            verbosity(ctx),
        ),
        TrackOutcome::AlreadyTracked(entry) => output::print(
            format!(
                "'{}' is already tracked as '{}'",
                entry.path.display(),
                entry.filename
            ),
            verbosity(ctx),
        ),
    }
    Ok(())
}

/// Stop tracking a path in the active stash.
pub fn untrack(ctx: &Context, target: &str) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;

    let untracked = ws
        .tracked
        .untrack(target)
        .with_context(|| format!("Failed to untrack '{}'", target))?;

    let suffix = if untracked.removed_copy {
        " and removed its stored copy"
    } else {
        ""
    };
    output::success(
        format!("Untracked '{}'{}", untracked.entry.filename, suffix),
        verbosity(ctx),
    );
    Ok(())
}

/// List the paths tracked by the active stash.
pub fn tracked(ctx: &Context) -> Result<()> {
    let ws = workspace(ctx)?;
    let pairs: Vec<(String, String)> = ws
        .tracked
        .list_tracked()?
        .map(|e| (e.filename, e.path.display().to_string()))
        .collect();

    if pairs.is_empty() {
        output::print("Nothing tracked yet. Track a path with: stasher track <path>", verbosity(ctx));
    } else {
        output::data(output::format_pairs(&pairs));
    }
    Ok(())
}
