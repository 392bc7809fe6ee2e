//! Event classification on the consumer thread.
//!
//! Two halves live here:
//!
//! - [`CallbackHandler`] runs on the adapter driver's threads.  It only turns
//!   each callback into a [`Command`] and pushes it onto the queue (log lines
//!   and menu-state changes, which touch no state, go straight to `tracing`).
//!
//! - [`Coordinator`] runs on the consumer thread.  It owns the key state
//!   machine and the cached logical address, filters inbound protocol
//!   commands and classifies alerts.  Each raw event maps to at most one base
//!   command (`Standby`, `BecomeActive`, `KeyPress`, `Restart`, ...), which
//!   the supervisor handles before moving on to the next queued event.

use std::sync::Arc;

use cec_core::protocol::{DeckControlMode, PlayMode};
use cec_core::{
    AlertKind, CecCommand, Command, Keypress, LogLevel, LogicalAddress, Opcode, UserControlCode,
};
use tracing::{debug, error, info, trace, warn};

use super::command_queue::CommandQueue;
use super::key_repeat::{KeyRepeat, SinkError};

/// Callback surface registered with the adapter when it is opened.
///
/// Methods are called from threads owned by the driver, possibly
/// concurrently, so implementations must not block.
pub trait CecCallbacks: Send + Sync {
    fn on_log_message(&self, level: LogLevel, message: &str);

    fn on_key_press(&self, keypress: Keypress);

    fn on_command(&self, command: CecCommand);

    /// The adapter (re)negotiated its addresses; `primary` is ours.
    fn on_configuration_changed(&self, primary: LogicalAddress);

    fn on_alert(&self, kind: AlertKind, parameter: u32);

    fn on_menu_state_changed(&self, activated: bool);

    fn on_source_activated(&self, address: LogicalAddress, activated: bool);
}

/// Production [`CecCallbacks`]: enqueues everything.
pub struct CallbackHandler {
    queue: Arc<CommandQueue>,
}

impl CallbackHandler {
    pub fn new(queue: Arc<CommandQueue>) -> Self {
        Self { queue }
    }
}

impl CecCallbacks for CallbackHandler {
    fn on_log_message(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!(target: "libcec", "{message}"),
            LogLevel::Warning => warn!(target: "libcec", "{message}"),
            LogLevel::Notice => info!(target: "libcec", "{message}"),
            LogLevel::Traffic => debug!(target: "libcec", "{message}"),
            LogLevel::Debug => trace!(target: "libcec", "{message}"),
        }
    }

    fn on_key_press(&self, keypress: Keypress) {
        debug!("{keypress}");
        self.queue.push(Command::KeyEvent(keypress));
    }

    fn on_command(&self, command: CecCommand) {
        debug!("command received: {command}");
        self.queue.push(Command::Inbound(command));
    }

    fn on_configuration_changed(&self, primary: LogicalAddress) {
        debug!(%primary, "configuration changed");
        self.queue.push(Command::ConfigurationChanged(primary));
    }

    fn on_alert(&self, kind: AlertKind, parameter: u32) {
        debug!(%kind, parameter, "adapter alert");
        self.queue.push(Command::Alert(kind));
    }

    fn on_menu_state_changed(&self, activated: bool) {
        debug!(activated, "menu state changed");
    }

    fn on_source_activated(&self, address: LogicalAddress, activated: bool) {
        debug!(%address, activated, "source activation changed");
        self.queue.push(Command::SourceActivated { address, activated });
    }
}

/// Consumer-side event handling.
///
/// The classification methods return the base command an event turns into.
/// The supervisor acts on it straight away, at the event's place in the
/// queue, instead of sending it round the queue again behind later events.
pub struct Coordinator {
    keys: KeyRepeat,
    own_address: Option<LogicalAddress>,
    standby_hook_configured: bool,
}

impl Coordinator {
    /// `standby_hook_configured` decides whether a TV standby becomes a
    /// `Standby` command (which runs the hook) or a POWER key tap.
    pub fn new(keys: KeyRepeat, standby_hook_configured: bool) -> Self {
        Self {
            keys,
            own_address: None,
            standby_hook_configured,
        }
    }

    /// Forgets everything learned during the previous connection cycle.
    pub fn reset(&mut self) {
        self.keys.reset();
        self.own_address = None;
    }

    /// Our primary logical address, once the adapter has reported it.
    pub fn own_address(&self) -> Option<LogicalAddress> {
        self.own_address
    }

    pub fn key_event(&mut self, keypress: Keypress) -> Result<(), SinkError> {
        self.keys.handle(keypress)
    }

    /// Taps `keycode` (press, then release).
    pub fn key_press(&mut self, keycode: UserControlCode) -> Result<(), SinkError> {
        self.keys.tap(keycode)
    }

    pub fn release_all(&mut self) -> Result<(), SinkError> {
        self.keys.release_all()
    }

    pub fn configuration_changed(&mut self, primary: LogicalAddress) {
        if self.own_address != Some(primary) {
            info!(address = %primary, "using logical address");
        }
        self.own_address = Some(primary);
    }

    /// Classifies a protocol command seen on the bus.
    ///
    /// Only commands the TV sends to us or to everyone are considered, plus
    /// `ACTIVE_SOURCE` broadcasts from other devices, which mean we lost the
    /// active source.  `active` is whether we currently hold it.
    pub fn inbound(&self, command: &CecCommand, active: bool) -> Option<Command> {
        if command.opcode == Opcode::ACTIVE_SOURCE {
            return self.active_source_announced(command, active);
        }
        if !self.accepts(command) {
            trace!("ignoring {command}");
            return None;
        }

        match command.opcode {
            Opcode::STANDBY if self.standby_hook_configured => Some(Command::Standby),
            Opcode::STANDBY => Some(Command::KeyPress(UserControlCode::POWER)),
            Opcode::REQUEST_ACTIVE_SOURCE => active.then_some(Command::BecomeActive),
            Opcode::SET_MENU_LANGUAGE => {
                let language: String = command
                    .parameters
                    .iter()
                    .map(|&b| char::from(b))
                    .collect();
                info!(%language, "TV menu language");
                None
            }
            Opcode::DECK_CONTROL => {
                let mode = command.first_parameter().and_then(DeckControlMode::from_operand);
                (mode == Some(DeckControlMode::Stop))
                    .then_some(Command::KeyPress(UserControlCode::STOP))
            }
            Opcode::PLAY => match command.first_parameter().map(PlayMode::from_operand) {
                Some(PlayMode::Forward) => Some(Command::KeyPress(UserControlCode::PLAY)),
                Some(PlayMode::Still) => Some(Command::KeyPress(UserControlCode::PAUSE)),
                _ => None,
            },
            _ => None,
        }
    }

    /// `Restart` for every alert except `ServiceDevice`.
    pub fn alert(&self, kind: AlertKind) -> Option<Command> {
        if kind.requires_restart() {
            warn!(%kind, "adapter alert; restarting connection");
            Some(Command::Restart)
        } else {
            info!(%kind, "adapter alert");
            None
        }
    }

    /// Follows the TV's view of which source is active.
    ///
    /// The driver also reports our own `make_active_source` calls, so an
    /// activation while already `active` is not turned into another
    /// `BecomeActive` (which would re-assert and report again).
    pub fn source_activated(
        &self,
        address: LogicalAddress,
        activated: bool,
        active: bool,
    ) -> Option<Command> {
        if self.own_address != Some(address) {
            return None;
        }
        match (activated, active) {
            (true, false) => Some(Command::BecomeActive),
            (false, _) => Some(Command::BecomeInactive),
            (true, true) => {
                trace!("already the active source");
                None
            }
        }
    }

    /// Another device broadcasting `ACTIVE_SOURCE` took the input from us.
    fn active_source_announced(&self, command: &CecCommand, active: bool) -> Option<Command> {
        let own = self.own_address?;
        if !active || command.initiator == own || !command.destination.is_broadcast() {
            return None;
        }
        debug!(initiator = %command.initiator, "another device became the active source");
        Some(Command::BecomeInactive)
    }

    fn accepts(&self, command: &CecCommand) -> bool {
        command.initiator == LogicalAddress::TV
            && (command.destination.is_broadcast()
                || Some(command.destination) == self.own_address)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
