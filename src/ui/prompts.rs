//! ui::prompts
//!
//! Interactive confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode an
//! operation requiring confirmation fails with a clear error unless `--yes`
//! already answered it.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("confirmation required; re-run with --yes to proceed non-interactively")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Prompt for confirmation (yes/no) on stdin.
///
/// Returns `Ok(true)` immediately if `assume_yes` is set. Otherwise returns
/// `Ok(true)` only if the user answers `y` or `yes`.
///
/// # Errors
///
/// `NotInteractive` if a prompt is needed but input is not interactive.
pub fn confirm(message: &str, interactive: bool, assume_yes: bool) -> Result<bool, PromptError> {
    if assume_yes {
        return Ok(true);
    }
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let stdin = io::stdin();
    let mut stderr = io::stderr();
    confirm_with(message, &mut stdin.lock(), &mut stderr)
}

fn confirm_with<R: BufRead, W: Write>(
    message: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool, PromptError> {
    write!(output, "{} [y/N] ", message).map_err(|e| PromptError::IoError(e.to_string()))?;
    output
        .flush()
        .map_err(|e| PromptError::IoError(e.to_string()))?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    if read == 0 {
        return Err(PromptError::Cancelled);
    }

    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
