//! Domain value types for cec-daemon.
//!
//! Nothing in here touches the CEC driver or the kernel; these types can be
//! built and tested on any platform.

/// HDMI physical / logical port addressing.
///
/// See [`address::Address`] for the main type.
pub mod address;

/// Commands processed by the daemon's consumer thread.
pub mod command;
