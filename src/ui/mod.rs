//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive confirmations
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All user-facing output and prompts go through this module so that
//! `--quiet` and non-interactive runs behave the same in every command.
//! Diagnostics go through `tracing` instead.

pub mod output;
pub mod prompts;
