//! Connection lifecycle: open, run the command loop, restart, close.
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//!            run()
//!              │
//!   ┌──────────▼──────────┐  discover + open   ┌────────┐ start_active ┌────────┐
//!   │ Closed              ├───────────────────►│ Open   ├─────────────►│ Active │
//!   └──────────▲──────────┘                    └───┬────┘              └──┬──▲──┘
//!              │                                   │ BecomeActive         │  │
//!              │ Exit / ping failure / Restart     ▼                      ▼  │
//!              └──────────────────────────────  Inactive ◄── BecomeInactive  │
//!                                                  └──────── BecomeActive ───┘
//! ```
//!
//! A `Restart` closes the adapter and goes straight back to discovery with no
//! held keys.  Whatever the old connection left in the queue is dropped,
//! except `Exit`: a stop request queued behind a restart, or arriving while
//! the adapter is being reopened, still stops the daemon.  `Exit` and a
//! failed watchdog ping close the adapter and return from [`Supervisor::run`].
//!
//! # Watchdog
//!
//! When no command arrives for [`SupervisorConfig::watchdog`] the loop pings
//! the adapter.  Some USB adapters stop answering without the driver ever
//! raising an alert; the ping is how that is noticed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cec_core::{Address, Command, KeyMap};
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use super::command_queue::{CommandQueue, DEFAULT_WATCHDOG_INTERVAL};
use super::coordinator::{CallbackHandler, CecCallbacks, Coordinator};
use super::key_repeat::{InputSink, KeyRepeat, SinkError};

// ── Adapter boundary ──────────────────────────────────────────────────────────

/// A CEC adapter as reported by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDescriptor {
    /// Bus path, e.g. `/sys/devices/.../usb1/1-1`.  Stable across reboots.
    pub path: String,
    /// Device node to open, e.g. `/dev/ttyACM0` or `/dev/cec0`.
    pub comm_port: String,
}

impl fmt::Display for AdapterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.comm_port, self.path)
    }
}

/// Error reported by the adapter driver.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("adapter driver error: {0}")]
    Driver(String),
    #[error("adapter is not open")]
    NotOpen,
}

/// Driver-owned CEC adapter.
///
/// Implementations live in the infrastructure layer: a libcec backend and a
/// scripted in-memory double.
pub trait CecAdapterClient: Send {
    fn list_adapters(&self) -> Result<Vec<AdapterDescriptor>, AdapterError>;

    /// Port to announce on the next [`open`](Self::open).
    fn set_target_address(&mut self, address: &Address);

    /// Opens `comm_port` and starts delivering callbacks to `callbacks`.
    fn open(
        &mut self,
        comm_port: &str,
        callbacks: Arc<dyn CecCallbacks>,
    ) -> Result<(), AdapterError>;

    /// Closes the adapter.  With `deassert_active` the TV is first told we
    /// are no longer the active source.
    fn close(&mut self, deassert_active: bool);

    /// Returns `false` if the adapter stopped answering.
    fn ping(&mut self) -> bool;

    fn make_active_source(&mut self) -> Result<(), AdapterError>;
}

// ── Hook boundary ─────────────────────────────────────────────────────────────

/// Error type for external hook commands.  Never fatal.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to start hook `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("hook `{command}` exited with status {code:?}")]
    NonZeroExit { command: String, code: Option<i32> },
}

/// Runs a user-configured command to completion.
#[cfg_attr(test, mockall::automock)]
pub trait HookRunner: Send + Sync {
    fn run(&self, command: &str) -> Result<(), HookError>;
}

/// The three optional commands run on state changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookCommands {
    pub on_standby: Option<String>,
    pub on_activate: Option<String>,
    pub on_deactivate: Option<String>,
}

// ── Supervisor ────────────────────────────────────────────────────────────────

/// Everything the supervisor needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// OSD name shown by the TV.
    pub device_name: String,
    /// HDMI port to announce.  `None` lets the adapter autodetect.
    pub target: Option<Address>,
    pub start_active: bool,
    pub hooks: HookCommands,
    pub watchdog: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            device_name: "cec-daemon".to_string(),
            target: None,
            start_active: false,
            hooks: HookCommands::default(),
            watchdog: DEFAULT_WATCHDOG_INTERVAL,
        }
    }
}

/// Error type for the connection lifecycle.  All variants are fatal.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("no CEC adapters found")]
    NoAdaptersFound,
    #[error("no CEC adapter matches '{0}'")]
    AdapterNotFound(String),
    #[error("failed to open CEC adapter {port}: {source}")]
    AdapterOpenFailure {
        port: String,
        #[source]
        source: AdapterError,
    },
    #[error("failed to become the active source: {0}")]
    ActivationFailure(#[source] AdapterError),
    #[error("failed to discover CEC adapters: {0}")]
    Discovery(#[source] AdapterError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Open,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Restart,
    Exit,
}

#[derive(Debug, Clone, Copy)]
enum Hook {
    Standby,
    Activate,
    Deactivate,
}

/// Owns the adapter and drives the queue's consumer loop.
pub struct Supervisor {
    adapter: Box<dyn CecAdapterClient>,
    queue: Arc<CommandQueue>,
    coordinator: Coordinator,
    hooks: Arc<dyn HookRunner>,
    config: SupervisorConfig,
    state: ConnectionState,
}

impl Supervisor {
    pub fn new(
        adapter: Box<dyn CecAdapterClient>,
        queue: Arc<CommandQueue>,
        keymap: Arc<KeyMap>,
        sink: Arc<dyn InputSink>,
        hooks: Arc<dyn HookRunner>,
        config: SupervisorConfig,
    ) -> Self {
        let keys = KeyRepeat::new(keymap, sink);
        let coordinator = Coordinator::new(keys, config.hooks.on_standby.is_some());
        Self {
            adapter,
            queue,
            coordinator,
            hooks,
            config,
            state: ConnectionState::Closed,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Adapters the driver can see, for `--list`.
    pub fn list_adapters(&self) -> Result<Vec<AdapterDescriptor>, SupervisorError> {
        self.adapter.list_adapters().map_err(SupervisorError::Discovery)
    }

    /// Runs connection cycles until `Exit` or a failed ping.
    ///
    /// `device_hint` selects the adapter by path or comm port.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError`] if discovery, open, or the initial
    /// activation fails.  The adapter is closed again in the activation case.
    pub fn run(&mut self, device_hint: Option<&str>) -> Result<(), SupervisorError> {
        if self.queue.is_shut_down() {
            self.queue.reopen();
        }
        while self.run_cycle(device_hint)? {
            info!("restarting CEC connection");
        }
        Ok(())
    }

    /// One open → loop → close cycle.  Returns whether to restart.
    fn run_cycle(&mut self, device_hint: Option<&str>) -> Result<bool, SupervisorError> {
        let stale = self.queue.retain(|command| *command == Command::Exit);
        if stale > 0 {
            debug!(stale, "dropped commands from the previous connection");
        }
        self.coordinator.reset();

        if let Some(target) = &self.config.target {
            debug!(%target, "target address");
            self.adapter.set_target_address(target);
        }

        let adapters = self.list_adapters()?;
        let chosen = select_adapter(&adapters, device_hint)?.clone();
        info!(adapter = %chosen, name = %self.config.device_name, "opening CEC adapter");

        let callbacks: Arc<dyn CecCallbacks> =
            Arc::new(CallbackHandler::new(Arc::clone(&self.queue)));
        self.adapter
            .open(&chosen.comm_port, callbacks)
            .map_err(|source| SupervisorError::AdapterOpenFailure {
                port: chosen.comm_port.clone(),
                source,
            })?;
        self.state = ConnectionState::Open;

        if self.config.start_active {
            if let Err(e) = self.adapter.make_active_source() {
                self.queue.shutdown();
                self.adapter.close(true);
                self.state = ConnectionState::Closed;
                return Err(SupervisorError::ActivationFailure(e));
            }
            self.state = ConnectionState::Active;
            self.run_hook(Hook::Activate);
        }

        let mut flow = self.command_loop();
        if flow == Flow::Restart && self.queue.pop_all().contains(&Command::Exit) {
            info!("exit requested while restarting");
            flow = Flow::Exit;
        }
        let restart = flow == Flow::Restart;

        if !restart {
            self.queue.shutdown();
        }
        if let Err(e) = self.coordinator.release_all() {
            warn!("failed to release held keys: {e}");
        }
        self.adapter.close(!restart);
        self.state = ConnectionState::Closed;
        debug!(restart, "CEC adapter closed");
        Ok(restart)
    }

    /// Drains the queue until a command or the watchdog ends the cycle.
    ///
    /// Returns `Flow::Restart` or `Flow::Exit`.  An `Exit` later in the
    /// same batch as a `Restart` wins.
    fn command_loop(&mut self) -> Flow {
        loop {
            let Some(first) = self.queue.wait_and_pop(self.config.watchdog) else {
                if self.adapter.ping() {
                    trace!("watchdog ping ok");
                    continue;
                }
                error!("CEC adapter stopped responding");
                return Flow::Exit;
            };

            let mut batch = vec![first];
            batch.extend(self.queue.pop_all());
            let mut commands = batch.into_iter();
            while let Some(command) = commands.next() {
                match self.dispatch(command) {
                    Flow::Continue => {}
                    Flow::Restart if commands.any(|c| c == Command::Exit) => {
                        info!("exit requested while restarting");
                        return Flow::Exit;
                    }
                    flow => return flow,
                }
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Flow {
        trace!(?command, "dispatch");
        match command {
            Command::Standby => {
                info!("TV went to standby");
                self.run_hook(Hook::Standby);
            }
            Command::BecomeActive => {
                if self.state == ConnectionState::Active {
                    if let Err(e) = self.adapter.make_active_source() {
                        warn!("failed to re-assert active source: {e}");
                    }
                } else {
                    info!("became the active source");
                    self.state = ConnectionState::Active;
                    self.run_hook(Hook::Activate);
                }
            }
            Command::BecomeInactive => {
                info!("no longer the active source");
                self.state = ConnectionState::Inactive;
                self.run_hook(Hook::Deactivate);
            }
            Command::Restart => return Flow::Restart,
            Command::Exit => return Flow::Exit,
            Command::KeyPress(keycode) => log_sink(self.coordinator.key_press(keycode)),
            Command::KeyEvent(keypress) => log_sink(self.coordinator.key_event(keypress)),
            Command::Inbound(command) => {
                let active = self.state == ConnectionState::Active;
                if let Some(derived) = self.coordinator.inbound(&command, active) {
                    return self.dispatch(derived);
                }
            }
            Command::ConfigurationChanged(primary) => {
                self.coordinator.configuration_changed(primary);
            }
            Command::SourceActivated { address, activated } => {
                let active = self.state == ConnectionState::Active;
                if let Some(derived) = self.coordinator.source_activated(address, activated, active) {
                    return self.dispatch(derived);
                }
            }
            Command::Alert(kind) => {
                if let Some(derived) = self.coordinator.alert(kind) {
                    return self.dispatch(derived);
                }
            }
        }
        Flow::Continue
    }

    fn run_hook(&self, hook: Hook) {
        let command = match hook {
            Hook::Standby => &self.config.hooks.on_standby,
            Hook::Activate => &self.config.hooks.on_activate,
            Hook::Deactivate => &self.config.hooks.on_deactivate,
        };
        let Some(command) = command else {
            return;
        };
        debug!(?hook, %command, "running hook");
        if let Err(e) = self.hooks.run(command) {
            warn!("{e}");
        }
    }
}

fn log_sink(result: Result<(), SinkError>) {
    if let Err(e) = result {
        error!("input device: {e}");
    }
}

/// Picks the adapter matching `hint` by path or comm port, or the first one.
pub fn select_adapter<'a>(
    adapters: &'a [AdapterDescriptor],
    hint: Option<&str>,
) -> Result<&'a AdapterDescriptor, SupervisorError> {
    if adapters.is_empty() {
        return Err(SupervisorError::NoAdaptersFound);
    }
    match hint {
        Some(hint) => adapters
            .iter()
            .find(|a| a.path == hint || a.comm_port == hint)
            .ok_or_else(|| SupervisorError::AdapterNotFound(hint.to_string())),
        None => Ok(&adapters[0]),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
