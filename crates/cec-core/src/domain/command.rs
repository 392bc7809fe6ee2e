//! Commands queued for the daemon's single consumer thread.
//!
//! Driver callbacks, the alert path and signal handlers never touch daemon
//! state directly.  They wrap what happened in a [`Command`] and push it onto
//! the queue; the consumer thread then processes commands one at a time in
//! FIFO order.

use crate::protocol::{AlertKind, CecCommand, Keypress, LogicalAddress, UserControlCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The TV asked us to go to standby.
    Standby,
    /// We are (or must re-assert that we are) the active source.
    BecomeActive,
    /// Another device took over as active source.
    BecomeInactive,
    /// Tear the adapter connection down and open it again.
    Restart,
    /// Synthesize one full press-and-release of a button.
    KeyPress(UserControlCode),
    /// Stop the daemon.
    Exit,

    // Raw driver events.  These are classified on the consumer thread, which
    // is the only place that knows the cached logical address and the
    // connection state.
    /// A remote button went down, repeated, or came up.
    KeyEvent(Keypress),
    /// A protocol message seen on the bus.
    Inbound(CecCommand),
    /// The driver (re)assigned our primary logical address.
    ConfigurationChanged(LogicalAddress),
    /// A device became, or stopped being, the active source.
    SourceActivated {
        address: LogicalAddress,
        activated: bool,
    },
    /// The adapter reported an out-of-band condition.
    Alert(AlertKind),
}
