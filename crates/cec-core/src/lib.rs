//! # cec-core
//!
//! Shared library for cec-daemon containing the HDMI address codec, the CEC
//! protocol vocabulary, and the CEC-to-Linux key translation table.
//!
//! It has zero dependencies on OS APIs, the vendor CEC driver, or the kernel
//! input subsystem.
//!
//! # Architecture overview (for beginners)
//!
//! HDMI-CEC (Consumer Electronics Control) is a slow, single-wire bus carried
//! inside every HDMI cable.  A TV uses it to tell the devices plugged into it
//! that a remote-control button was pressed, that the set is going to standby,
//! or that a particular input became the "active source".  cec-daemon listens
//! on that bus and replays the remote's buttons as keyboard events on a PC.
//!
//! This crate (`cec-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure value types: the HDMI [`Address`] mini-language
//!   (`1.0.0.0`, `tv.2`, `av.1`) and the [`Command`]s the daemon's single
//!   consumer thread processes.
//!
//! - **`protocol`** – The subset of the CEC vocabulary the daemon understands:
//!   logical addresses, opcodes, user-control (button) codes, adapter alerts.
//!
//! - **`keymap`** – The fixed table that turns a CEC button code into zero, one,
//!   or several Linux input key codes.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::address::{Address, AddressError, LogicalDeviceKind, PhysicalAddress};
pub use domain::command::Command;
pub use keymap::{InputKey, KeyMap};
pub use protocol::{
    AlertKind, CecCommand, Keypress, LogLevel, LogicalAddress, Opcode, UserControlCode,
};
