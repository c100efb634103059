//! config command - Show or initialize configuration

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use super::verbosity;
use crate::core::config::{Config, StasherConfig, CONFIG_ENV};
use crate::engine::Context;
use crate::ui::output;

/// Print the effective configuration and where each part came from.
pub fn show(ctx: &Context) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let source = config
        .loaded_from()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none, using defaults)".to_string());
    let data_dir = match &ctx.data_dir {
        Some(dir) => dir.clone(),
        None => config.data_dir().context("Failed to resolve data directory")?,
    };

    output::data("# Stasher Configuration");
    output::data(format!("config file     = {}", source));
    output::data(format!("data_dir        = {}", data_dir.display()));
    output::data(format!(
        "follow_symlinks = {}",
        config.follow_symlinks() && !ctx.no_follow_symlinks
    ));
    output::data(format!("apply.conflict  = {}", config.apply_conflict()));

    let hooks = config.reload_hooks();
    if hooks.is_empty() {
        output::data("reload.hooks    = (none)");
    } else {
        output::data("reload.hooks    =");
        output::data(output::format_list(&hooks, "  - "));
    }
    Ok(())
}

/// Write the starter config file.
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    let path = match std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        Some(path) => PathBuf::from(path),
        None => Config::config_path().context("Failed to locate config directory")?,
    };

    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::write(&path, &StasherConfig::starter()).context("Failed to write config")?;

    output::success(format!("Wrote {}", path.display()), verbosity(ctx));
    Ok(())
}
