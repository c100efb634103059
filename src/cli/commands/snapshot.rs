//! snapshot commands - push, apply, reload

use anyhow::{Context as _, Result};

use super::{open, verbosity, workspace};
use crate::core::config::Config;
use crate::core::types::ConflictPolicy;
use crate::engine::{reload_dependents, Context, HookStatus};
use crate::ui::output::{self, Verbosity};

/// Copy tracked paths into the active stash.
pub fn push(ctx: &Context) -> Result<()> {
    let ws = workspace(ctx)?;
    let _lock = ws.lock()?;
    let v = verbosity(ctx);

    let report = ws.snapshot().push().context("Failed to push")?;
    for filename in &report.pushed {
        output::print(format!("  pushed {}", filename), v);
    }
    let stash = report.stash.clone();
    let report = report
        .into_result()
        .with_context(|| format!("Some entries could not be pushed to '{}'", stash))?;

    output::success(
        format!("Pushed {} entries to '{}'", report.pushed.len(), report.stash),
        v,
    );
    Ok(())
}

/// Restore a stash, then optionally reload dependents.
pub fn apply(ctx: &Context, name: &str, skip_existing: bool, reload: bool) -> Result<()> {
    let (config, ws) = open(ctx)?;
    let _lock = ws.lock()?;
    let v = verbosity(ctx);

    let conflict = if skip_existing {
        ConflictPolicy::Skip
    } else {
        ws.copy_options().conflict
    };

    let report = ws
        .snapshot()
        .apply(name, conflict)
        .with_context(|| format!("Failed to apply stash '{}'", name))?;

    for applied in &report.applied {
        output::print(
            format!("  {} -> {}", applied.entry, applied.destination.display()),
            v,
        );
    }
    for skipped in &report.skipped {
        output::warn(
            format!("'{}' has no tracked or registered destination, skipped", skipped),
            v,
        );
    }

    let applied = report.applied.len();
    let result = report
        .into_result()
        .with_context(|| format!("Stash '{}' was only partially applied", name));

    if reload {
        run_hooks(&config, v);
    }

    result?;
    output::success(format!("Applied {} entries from '{}'", applied, name), v);
    Ok(())
}

/// Run the reload hooks.
pub fn reload(ctx: &Context) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    run_hooks(&config, verbosity(ctx));
    Ok(())
}

fn run_hooks(config: &Config, v: Verbosity) {
    for outcome in reload_dependents(&config.reload_hooks()) {
        match outcome.status {
            HookStatus::Succeeded => output::print(format!("  reloaded: {}", outcome.hook), v),
            HookStatus::Exited(code) => output::warn(
                format!(
                    "'{}' exited with {}",
                    outcome.hook,
                    code.map_or_else(|| "a signal".to_string(), |c| format!("status {}", c))
                ),
                v,
            ),
            HookStatus::NotStarted(reason) => {
                output::warn(format!("could not run '{}': {}", outcome.hook, reason), v)
            }
        }
    }
}
