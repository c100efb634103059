//! engine::hooks
//!
//! Best-effort reload of programs that read the applied configuration.
//!
//! Each hook runs to completion before the next starts. A hook that cannot
//! be started or exits non-zero is logged and recorded, and the remaining
//! hooks still run.

use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::core::config::ReloadHook;

/// How one hook ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookStatus {
    /// Exited with status 0.
    Succeeded,
    /// Exited non-zero, or was killed by a signal (`None`).
    Exited(Option<i32>),
    /// Could not be started at all.
    NotStarted(String),
}

impl HookStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, HookStatus::Succeeded)
    }
}

/// Result of running one hook.
#[derive(Debug, Clone)]
pub struct HookOutcome {
    pub hook: ReloadHook,
    pub status: HookStatus,
}

/// Run every hook in order, ignoring individual failures.
pub fn reload_dependents(hooks: &[ReloadHook]) -> Vec<HookOutcome> {
    hooks
        .iter()
        .map(|hook| HookOutcome {
            hook: hook.clone(),
            status: run_hook(hook),
        })
        .collect()
}

fn run_hook(hook: &ReloadHook) -> HookStatus {
    debug!(hook = %hook, "running reload hook");
    let result = Command::new(&hook.program)
        .args(&hook.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) if status.success() => HookStatus::Succeeded,
        Ok(status) => {
            warn!(hook = %hook, code = ?status.code(), "reload hook failed");
            HookStatus::Exited(status.code())
        }
        Err(e) => {
            warn!(hook = %hook, error = %e, "reload hook could not be started");
            HookStatus::NotStarted(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hook_list_does_nothing() {
        assert!(reload_dependents(&[]).is_empty());
    }

    #[test]
    fn missing_program_does_not_stop_the_rest() {
        let hooks = vec![
            ReloadHook::new("stasher-test-no-such-program", &[]),
            ReloadHook::new("stasher-test-no-such-program-either", &["--flag"]),
        ];

        let outcomes = reload_dependents(&hooks);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.status, HookStatus::NotStarted(_))));
    }

    #[cfg(unix)]
    #[test]
    fn exit_codes_are_reported() {
        let hooks = vec![
            ReloadHook::new("sh", &["-c", "exit 3"]),
            ReloadHook::new("true", &[]),
        ];

        let outcomes = reload_dependents(&hooks);

        assert_eq!(outcomes[0].status, HookStatus::Exited(Some(3)));
        assert!(outcomes[1].status.is_success());
    }
}
