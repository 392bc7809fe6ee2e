//! The subset of the HDMI-CEC vocabulary the daemon works with.
//!
//! These types mirror what the vendor driver hands to its callbacks, but are
//! owned Rust values so they can be queued and moved to the consumer thread.

pub mod opcode;
pub mod user_control;

use std::fmt;
use std::time::Duration;

pub use opcode::{DeckControlMode, Opcode, PlayMode};
pub use user_control::UserControlCode;

/// A device's role on the CEC bus (0..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalAddress(u8);

impl LogicalAddress {
    pub const TV: Self = Self(0);
    pub const RECORDING_DEVICE_1: Self = Self(1);
    pub const RECORDING_DEVICE_2: Self = Self(2);
    pub const TUNER_1: Self = Self(3);
    pub const PLAYBACK_DEVICE_1: Self = Self(4);
    pub const AUDIO_SYSTEM: Self = Self(5);
    pub const TUNER_2: Self = Self(6);
    pub const TUNER_3: Self = Self(7);
    pub const PLAYBACK_DEVICE_2: Self = Self(8);
    pub const RECORDING_DEVICE_3: Self = Self(9);
    pub const TUNER_4: Self = Self(10);
    pub const PLAYBACK_DEVICE_3: Self = Self(11);
    pub const FREE_USE: Self = Self(14);
    /// As a destination this is the broadcast address; as an initiator it
    /// means "unregistered".
    pub const BROADCAST: Self = Self(15);

    /// Returns `None` for values outside the 4-bit range.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 15 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn is_broadcast(self) -> bool {
        self == Self::BROADCAST
    }

    fn name(self) -> &'static str {
        match self.0 {
            0 => "TV",
            1 => "Recorder 1",
            2 => "Recorder 2",
            3 => "Tuner 1",
            4 => "Playback 1",
            5 => "Audio",
            6 => "Tuner 2",
            7 => "Tuner 3",
            8 => "Playback 2",
            9 => "Recorder 3",
            10 => "Tuner 4",
            11 => "Playback 3",
            12 | 13 => "Reserved",
            14 => "Free use",
            _ => "Broadcast",
        }
    }
}

impl fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

/// A button event as reported by the driver.
///
/// `duration == 0` means "down / still down"; anything else means "released
/// after being held for `duration`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keypress {
    pub keycode: UserControlCode,
    pub duration: Duration,
}

impl Keypress {
    pub fn down(keycode: UserControlCode) -> Self {
        Self { keycode, duration: Duration::ZERO }
    }

    pub fn released(keycode: UserControlCode, held_for: Duration) -> Self {
        Self { keycode, duration: held_for }
    }

    pub fn is_release(&self) -> bool {
        !self.duration.is_zero()
    }
}

impl fmt::Display for Keypress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key press: {} for {}ms",
            self.keycode,
            self.duration.as_millis()
        )
    }
}

/// A protocol message seen on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CecCommand {
    pub initiator: LogicalAddress,
    pub destination: LogicalAddress,
    pub opcode: Opcode,
    pub parameters: Vec<u8>,
}

impl CecCommand {
    /// First parameter byte, if any.
    pub fn first_parameter(&self) -> Option<u8> {
        self.parameters.first().copied()
    }
}

impl fmt::Display for CecCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            self.initiator, self.destination, self.opcode
        )?;
        for byte in &self.parameters {
            write!(f, " {byte:02x}")?;
        }
        Ok(())
    }
}

/// Out-of-band conditions the adapter driver reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// The adapter wants servicing (firmware upgrade etc.); informational.
    ServiceDevice,
    ConnectionLost,
    PermissionError,
    PortBusy,
    PhysicalAddressError,
    TvPollFailed,
}

impl AlertKind {
    /// Whether the connection has to be torn down and reopened.
    pub fn requires_restart(self) -> bool {
        !matches!(self, AlertKind::ServiceDevice)
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertKind::ServiceDevice => "service device",
            AlertKind::ConnectionLost => "connection lost",
            AlertKind::PermissionError => "permission error",
            AlertKind::PortBusy => "port busy",
            AlertKind::PhysicalAddressError => "physical address error",
            AlertKind::TvPollFailed => "TV poll failed",
        };
        f.write_str(name)
    }
}

/// Severity of a driver log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Error,
    Warning,
    Notice,
    Traffic,
    Debug,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_address_rejects_values_above_15() {
        assert!(LogicalAddress::new(16).is_none());
        assert_eq!(LogicalAddress::new(15), Some(LogicalAddress::BROADCAST));
    }

    #[test]
    fn test_only_service_device_alert_is_informational() {
        assert!(!AlertKind::ServiceDevice.requires_restart());
        for kind in [
            AlertKind::ConnectionLost,
            AlertKind::PermissionError,
            AlertKind::PortBusy,
            AlertKind::PhysicalAddressError,
            AlertKind::TvPollFailed,
        ] {
            assert!(kind.requires_restart(), "{kind} must trigger a restart");
        }
    }

    #[test]
    fn test_keypress_release_is_nonzero_duration() {
        assert!(!Keypress::down(UserControlCode::UP).is_release());
        assert!(Keypress::released(UserControlCode::UP, Duration::from_millis(1)).is_release());
    }

    #[test]
    fn test_command_display_includes_parameters() {
        let cmd = CecCommand {
            initiator: LogicalAddress::TV,
            destination: LogicalAddress::PLAYBACK_DEVICE_1,
            opcode: Opcode::PLAY,
            parameters: vec![0x24],
        };
        assert_eq!(cmd.to_string(), "TV (0) -> Playback 1 (4): PLAY 24");
    }
}
