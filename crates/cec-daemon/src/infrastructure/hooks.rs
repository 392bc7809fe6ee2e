//! Runs user-configured shell commands on state changes.
//!
//! Hooks run synchronously on the consumer thread through `sh -c`, so a slow
//! hook delays key handling until it returns.  Standard output and error are
//! inherited from the daemon and end up wherever its own output goes (the
//! journal, under systemd).

use std::process::Command;

use tracing::debug;

use crate::application::supervisor::{HookError, HookRunner};

/// [`HookRunner`] that hands the command line to `/bin/sh`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellHookRunner;

impl HookRunner for ShellHookRunner {
    fn run(&self, command: &str) -> Result<(), HookError> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|source| HookError::Spawn {
                command: command.to_string(),
                source,
            })?;

        debug!(%command, %status, "hook finished");
        if status.success() {
            Ok(())
        } else {
            Err(HookError::NonZeroExit {
                command: command.to_string(),
                code: status.code(),
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
