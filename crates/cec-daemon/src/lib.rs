//! cec-daemon library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does cec-daemon do? (for beginners)
//!
//! A TV remote talks to the TV.  When the TV supports HDMI-CEC it forwards
//! button presses for the currently selected input over the HDMI cable to the
//! device plugged into that input.  cec-daemon is that device's side:
//!
//! 1. Opens a CEC adapter (a USB dongle, or the GPU's built-in CEC pin).
//! 2. Receives button events and protocol messages from the adapter driver on
//!    the driver's own threads, and queues them as `Command`s.
//! 3. Processes the queue on a single thread: turns button down/repeat/up
//!    events into key presses on a virtual keyboard, reacts to standby and
//!    active-source changes, and restarts the connection if the adapter
//!    reports a fatal condition.
//! 4. Pings the adapter whenever the queue has been idle for a while, so a
//!    silently dead connection is noticed.

/// Application layer: the command queue, key state machine, coordinator and
/// connection supervisor.
pub mod application;

/// Infrastructure layer: adapter backends, input sinks, hooks, signals, and
/// configuration storage.
pub mod infrastructure;
