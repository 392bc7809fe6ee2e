//! Process signal → [`Command`] translation.
//!
//! Signals are just another producer for the command queue: a tokio task per
//! signal kind waits for deliveries and pushes the matching command.  The
//! consumer sees them in order with everything else the adapter reported.
//!
//! | Signal             | Command   |
//! |--------------------|-----------|
//! | `SIGHUP`           | `Restart` |
//! | `SIGINT`/`SIGTERM` | `Exit`    |

use std::sync::Arc;

use cec_core::Command;
use tracing::info;

use crate::application::command_queue::CommandQueue;

/// The signals the daemon reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSignal {
    Hangup,
    Interrupt,
    Terminate,
}

impl ProcessSignal {
    pub const ALL: [ProcessSignal; 3] = [
        ProcessSignal::Hangup,
        ProcessSignal::Interrupt,
        ProcessSignal::Terminate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProcessSignal::Hangup => "SIGHUP",
            ProcessSignal::Interrupt => "SIGINT",
            ProcessSignal::Terminate => "SIGTERM",
        }
    }
}

pub fn signal_to_command(signal: ProcessSignal) -> Command {
    match signal {
        ProcessSignal::Hangup => Command::Restart,
        ProcessSignal::Interrupt | ProcessSignal::Terminate => Command::Exit,
    }
}

/// Installs handlers for [`ProcessSignal::ALL`] and forwards deliveries to
/// `queue` until the runtime shuts down.
///
/// The handlers are registered before this returns, so a signal sent right
/// after the call is not lost.
///
/// # Errors
///
/// Returns the OS error if a handler cannot be registered.
#[cfg(unix)]
pub fn spawn_signal_listeners(
    queue: Arc<CommandQueue>,
) -> std::io::Result<Vec<tokio::task::JoinHandle<()>>> {
    use tokio::signal::unix::{signal, SignalKind};

    ProcessSignal::ALL
        .into_iter()
        .map(|which| -> std::io::Result<tokio::task::JoinHandle<()>> {
            let kind = match which {
                ProcessSignal::Hangup => SignalKind::hangup(),
                ProcessSignal::Interrupt => SignalKind::interrupt(),
                ProcessSignal::Terminate => SignalKind::terminate(),
            };
            let mut stream = signal(kind)?;
            let queue = Arc::clone(&queue);
            Ok(tokio::spawn(async move {
                while stream.recv().await.is_some() {
                    info!(signal = which.name(), "signal received");
                    queue.push(signal_to_command(which));
                }
            }))
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
