//! HDMI port addressing: the `a.b.c.d` / `tv.N` / `av.N` mini-language.
//!
//! # Physical vs. logical addressing (for beginners)
//!
//! Every HDMI sink and source has a **physical address**: four 4-bit fields
//! describing its position in the cable tree.  The TV itself is `0.0.0.0`, a
//! device plugged into TV input 2 is `2.0.0.0`, and a device plugged into
//! input 1 of an AV receiver that sits on TV input 3 is `3.1.0.0`.
//!
//! Users rarely know that tree, so the daemon also accepts a **logical**
//! shorthand naming the device we are plugged into and its input number:
//!
//! | Text     | Meaning                                           |
//! |----------|---------------------------------------------------|
//! | `tv`     | plugged into the TV, let the driver detect the port |
//! | `tv.2`   | plugged into TV input 2                           |
//! | `av.1`   | plugged into input 1 of the audio system          |
//! | `1.0.0.0`| explicit physical address                         |
//!
//! The audio system has no autodetect, so `av` on its own is rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::LogicalAddress;

/// Error returned when address text does not follow the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid HDMI address '{0}'")]
    InvalidAddress(String),
}

/// Four 4-bit fields packed as `(a<<12)|(b<<8)|(c<<4)|d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PhysicalAddress(u16);

impl PhysicalAddress {
    /// Builds an address from its four fields.
    ///
    /// Returns `None` if any field is greater than 15.
    pub fn new(a: u8, b: u8, c: u8, d: u8) -> Option<Self> {
        if [a, b, c, d].iter().any(|&f| f > 15) {
            return None;
        }
        Some(Self(
            (u16::from(a) << 12) | (u16::from(b) << 8) | (u16::from(c) << 4) | u16::from(d),
        ))
    }

    /// Wraps an already-packed 16-bit value.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the packed 16-bit value handed to the CEC driver.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns field `index` (0 = most significant).
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`.
    pub fn field(self, index: usize) -> u8 {
        assert!(index < 4, "physical address has four fields");
        ((self.0 >> ((3 - index) * 4)) & 0x0F) as u8
    }

    /// Returns all four fields in order.
    pub fn fields(self) -> [u8; 4] {
        [self.field(0), self.field(1), self.field(2), self.field(3)]
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.fields();
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl FromStr for PhysicalAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::InvalidAddress(s.to_string());

        let mut fields = [0u8; 4];
        let mut count = 0;
        for token in s.split('.') {
            if count == 4 {
                return Err(invalid());
            }
            fields[count] = parse_nibble(token).ok_or_else(invalid)?;
            count += 1;
        }
        if count != 4 {
            return Err(invalid());
        }

        let [a, b, c, d] = fields;
        Self::new(a, b, c, d).ok_or_else(invalid)
    }
}

/// The device our HDMI cable is plugged into, for logical addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalDeviceKind {
    Tv,
    AudioSystem,
}

impl LogicalDeviceKind {
    /// The CEC logical address of that device.
    pub fn logical_address(self) -> LogicalAddress {
        match self {
            LogicalDeviceKind::Tv => LogicalAddress::TV,
            LogicalDeviceKind::AudioSystem => LogicalAddress::AUDIO_SYSTEM,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            LogicalDeviceKind::Tv => "tv",
            LogicalDeviceKind::AudioSystem => "av",
        }
    }
}

/// A parsed HDMI target: either a physical address or a device/port pair.
///
/// Serialized as its text form so it can sit in the TOML config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Address {
    Physical(PhysicalAddress),
    /// `port == 0` means "autodetect" and is only legal for the TV.
    Logical { device: LogicalDeviceKind, port: u8 },
}

impl Address {
    /// Builds a logical address, enforcing the port rules.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidAddress`] when `port > 15`, or when
    /// `port == 0` for anything other than the TV.
    pub fn logical(device: LogicalDeviceKind, port: u8) -> Result<Self, AddressError> {
        let candidate = Address::Logical { device, port };
        let valid = match device {
            LogicalDeviceKind::Tv => port <= 15,
            LogicalDeviceKind::AudioSystem => (1..=15).contains(&port),
        };
        if valid {
            Ok(candidate)
        } else {
            Err(AddressError::InvalidAddress(candidate.to_string()))
        }
    }

    /// Returns the physical address if this is the physical form.
    pub fn physical(&self) -> Option<PhysicalAddress> {
        match self {
            Address::Physical(p) => Some(*p),
            Address::Logical { .. } => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Physical(p) => fmt::Display::fmt(p, f),
            Address::Logical { device, port: 0 } => f.write_str(device.prefix()),
            Address::Logical { device, port } => write!(f, "{}.{port}", device.prefix()),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::InvalidAddress(s.to_string());

        if s.starts_with(|c: char| c.is_ascii_digit()) {
            return s.parse().map(Address::Physical);
        }

        // `get` keeps us on a char boundary for non-ASCII input.
        let prefix = s.get(..2).ok_or_else(invalid)?;
        let device = if prefix.eq_ignore_ascii_case("tv") {
            LogicalDeviceKind::Tv
        } else if prefix.eq_ignore_ascii_case("av") {
            LogicalDeviceKind::AudioSystem
        } else {
            return Err(invalid());
        };

        let rest = &s[2..];
        if rest.is_empty() {
            return Address::logical(device, 0).map_err(|_| invalid());
        }

        let port = rest
            .strip_prefix('.')
            .and_then(parse_nibble)
            .filter(|&p| p >= 1)
            .ok_or_else(invalid)?;
        Address::logical(device, port).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

/// Parses a decimal token in `0..=15`.  Signs, whitespace and empty tokens fail.
fn parse_nibble(token: &str) -> Option<u8> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Leading zeros are accepted, so trim them before the length check keeps
    // huge inputs like "0000000000000001" from overflowing.
    let trimmed = token.trim_start_matches('0');
    if trimmed.len() > 2 {
        return None;
    }
    let value: u8 = if trimmed.is_empty() { 0 } else { trimmed.parse().ok()? };
    (value <= 15).then_some(value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── PhysicalAddress ───────────────────────────────────────────────────────

    #[test]
    fn test_physical_address_packs_fields_into_nibbles() {
        let addr = PhysicalAddress::new(1, 2, 3, 4).unwrap();
        assert_eq!(addr.raw(), 0x1234);
        assert_eq!(addr.fields(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_physical_address_rejects_field_above_15() {
        assert!(PhysicalAddress::new(16, 0, 0, 0).is_none());
        assert!(PhysicalAddress::new(0, 0, 0, 16).is_none());
    }

    #[test]
    fn test_physical_address_field_indexing_is_msb_first() {
        let addr = PhysicalAddress::from_raw(0xA0F1);
        assert_eq!(addr.field(0), 0xA);
        assert_eq!(addr.field(1), 0x0);
        assert_eq!(addr.field(2), 0xF);
        assert_eq!(addr.field(3), 0x1);
    }

    #[test]
    fn test_physical_address_displays_dotted_decimal() {
        let addr = PhysicalAddress::new(15, 0, 10, 1).unwrap();
        assert_eq!(addr.to_string(), "15.0.10.1");
    }

    // ── Parsing: physical ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_physical_address() {
        // Act
        let addr: Address = "1.0.0.0".parse().unwrap();

        // Assert
        assert_eq!(addr, Address::Physical(PhysicalAddress::from_raw(0x1000)));
    }

    #[test]
    fn test_parse_physical_accepts_leading_zeros() {
        let addr: Address = "01.0.00.15".parse().unwrap();
        assert_eq!(addr.physical().unwrap().fields(), [1, 0, 0, 15]);
    }

    #[test]
    fn test_parse_physical_rejects_malformed_inputs() {
        for bad in [
            "16", "1", "1.2", "1.2.3", "1.2.3.4.5", "1.2.3.16", "1..2.3", "1.2.3.",
            "1.2.3.4x", "1.2.3.-4", "1.2.3.+4", "1. 2.3.4", "1.2.3.4 ",
            "1.2.3.0000000000000000000016",
        ] {
            assert!(
                bad.parse::<Address>().is_err(),
                "'{bad}' must be rejected"
            );
        }
    }

    // ── Parsing: logical ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_tv_without_port_means_autodetect() {
        let addr: Address = "tv".parse().unwrap();
        assert_eq!(
            addr,
            Address::Logical { device: LogicalDeviceKind::Tv, port: 0 }
        );
    }

    #[test]
    fn test_parse_tv_with_port() {
        let addr: Address = "tv.3".parse().unwrap();
        assert_eq!(
            addr,
            Address::Logical { device: LogicalDeviceKind::Tv, port: 3 }
        );
    }

    #[test]
    fn test_parse_av_with_port() {
        let addr: Address = "av.15".parse().unwrap();
        assert_eq!(
            addr,
            Address::Logical { device: LogicalDeviceKind::AudioSystem, port: 15 }
        );
    }

    #[test]
    fn test_parse_logical_prefix_is_case_insensitive() {
        assert_eq!("TV.2".parse::<Address>().unwrap(), "tv.2".parse().unwrap());
        assert_eq!("Av.1".parse::<Address>().unwrap(), "av.1".parse().unwrap());
    }

    #[test]
    fn test_parse_rejects_invalid_logical_forms() {
        for bad in [
            "av", "av.0", "tv.0", "tv.16", "av.16", "tv.", "tv3", "tvx", "tv.1.2",
            "dvd.1", "", "t", "é", "tv.-1",
        ] {
            assert_eq!(
                bad.parse::<Address>(),
                Err(AddressError::InvalidAddress(bad.to_string())),
                "'{bad}' must be rejected"
            );
        }
    }

    // ── Formatting ────────────────────────────────────────────────────────────

    #[test]
    fn test_format_suppresses_tv_autodetect_port() {
        let addr = Address::logical(LogicalDeviceKind::Tv, 0).unwrap();
        assert_eq!(addr.to_string(), "tv");
    }

    #[test]
    fn test_format_logical_with_port() {
        assert_eq!(
            Address::logical(LogicalDeviceKind::Tv, 4).unwrap().to_string(),
            "tv.4"
        );
        assert_eq!(
            Address::logical(LogicalDeviceKind::AudioSystem, 2).unwrap().to_string(),
            "av.2"
        );
    }

    #[test]
    fn test_logical_constructor_rejects_av_autodetect() {
        assert!(Address::logical(LogicalDeviceKind::AudioSystem, 0).is_err());
        assert!(Address::logical(LogicalDeviceKind::Tv, 16).is_err());
    }

    #[test]
    fn test_logical_device_kind_maps_to_cec_logical_address() {
        assert_eq!(LogicalDeviceKind::Tv.logical_address(), LogicalAddress::TV);
        assert_eq!(
            LogicalDeviceKind::AudioSystem.logical_address(),
            LogicalAddress::AUDIO_SYSTEM
        );
    }
}
