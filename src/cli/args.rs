//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--data-dir <path>`: Use this data root
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--yes` / `-y`: Answer yes to confirmations
//! - `--no-follow-symlinks`: Copy symlinks as links

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stasher - keep named snapshots of your configuration directories
#[derive(Parser, Debug)]
#[command(name = "stasher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store stashes and the path registry under this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Recreate symlinks as links instead of copying what they point to
    #[arg(long, global = true)]
    pub no_follow_symlinks: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Prompts are shown only when stdin is a terminal.
    pub fn interactive(&self) -> bool {
        std::io::stdin().is_terminal()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new stash
    #[command(
        name = "create",
        long_about = "Create a new, empty stash.\n\n\
            Stashes start empty; activate one and track paths to fill it. With \
            --from-paths the new stash tracks every registered path and is pushed \
            immediately.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Empty stash, filled by tracking
    stasher create dark
    stasher activate dark
    stasher track ~/.config/waybar
    stasher push

    # Snapshot every registered path at once
    stasher path add ~/.config/waybar
    stasher create dark --from-paths"
    )]
    Create {
        /// Name of the stash
        name: String,

        /// Track and copy every registered path into the new stash
        #[arg(long)]
        from_paths: bool,
    },

    /// Delete a stash and its contents
    Delete {
        /// Name of the stash
        name: String,
    },

    /// List all stashes
    #[command(visible_alias = "ls")]
    List,

    /// Make a stash the target of track and push
    Activate {
        /// Name of the stash
        name: String,
    },

    /// Clear the active stash
    Clear,

    /// Show the active stash
    Status,

    /// Show the contents of a stash
    Tree {
        /// Name of the stash
        name: String,
    },

    /// Track a file or directory in the active stash
    Track {
        /// Path to track
        path: PathBuf,
    },

    /// Stop tracking a path in the active stash
    Untrack {
        /// Tracked filename or source path
        target: String,
    },

    /// List the paths tracked by the active stash
    Tracked,

    /// Copy tracked paths into the active stash
    #[command(
        name = "push",
        visible_alias = "update",
        long_about = "Copy every tracked path into the active stash.\n\n\
            Each entry is copied to a staging location first and swapped in \
            when complete, so an entry that fails keeps its previous copy."
    )]
    Push,

    /// Copy a stash's contents back to their locations
    #[command(
        name = "apply",
        long_about = "Restore a stash's contents.\n\n\
            Each top-level entry of the stash is merged into the path it was \
            tracked from, or into the registered path with the same key. Files \
            at the destination that the stash does not contain are kept.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Switch to the dark theme and reload the desktop
    stasher apply dark --reload

    # Restore only files that are missing locally
    stasher apply dark --skip-existing"
    )]
    Apply {
        /// Name of the stash
        name: String,

        /// Keep files that already exist at the destination
        #[arg(long)]
        skip_existing: bool,

        /// Run the reload hooks afterwards
        #[arg(long)]
        reload: bool,
    },

    /// Run the configured reload hooks
    Reload,

    /// Delete every stash
    Wipe,

    /// Manage the path registry
    Path {
        #[command(subcommand)]
        action: PathAction,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for Stasher commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    stasher completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    stasher completion zsh >> ~/.zshrc

    # Fish
    stasher completion fish > ~/.config/fish/completions/stasher.fish

    # PowerShell
    stasher completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Path registry subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PathAction {
    /// Register a directory
    Add {
        /// Directory to register
        path: PathBuf,
    },
    /// Remove a registered path by path or key; `*` removes all
    #[command(visible_alias = "rm")]
    Remove {
        /// Path, key, or `*`
        target: String,
    },
    /// List registered paths
    #[command(visible_alias = "ls")]
    List,
    /// Remove every registered path
    Wipe,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_is_push() {
        let cli = Cli::try_parse_from(["stasher", "update"]).unwrap();
        assert!(matches!(cli.command, Command::Push));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["stasher", "wipe", "--yes", "--data-dir", "/tmp/s"]).unwrap();
        assert!(cli.yes);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/s")));
    }

    #[test]
    fn apply_flags() {
        let cli =
            Cli::try_parse_from(["stasher", "apply", "dark", "--skip-existing", "--reload"])
                .unwrap();
        match cli.command {
            Command::Apply {
                name,
                skip_existing,
                reload,
            } => {
                assert_eq!(name, "dark");
                assert!(skip_existing);
                assert!(reload);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn path_remove_star() {
        let cli = Cli::try_parse_from(["stasher", "path", "remove", "*"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Path {
                action: PathAction::Remove { ref target }
            } if target == "*"
        ));
    }
}
