//! Integration tests for the HDMI address codec.
//!
//! Walks the whole physical address space and the logical forms through
//! `parse(format(x))` and checks the grammar's rejection cases.

use cec_core::{Address, AddressError, LogicalDeviceKind, PhysicalAddress};

// ── Round-trip ────────────────────────────────────────────────────────────────

#[test]
fn test_every_physical_address_round_trips() {
    for raw in 0..=u16::MAX {
        let addr = Address::Physical(PhysicalAddress::from_raw(raw));
        let text = addr.to_string();
        let parsed: Address = text.parse().unwrap_or_else(|e| panic!("{text}: {e}"));
        assert_eq!(parsed, addr, "round trip failed for {text}");
    }
}

#[test]
fn test_every_logical_address_round_trips() {
    for port in 0..=15u8 {
        for device in [LogicalDeviceKind::Tv, LogicalDeviceKind::AudioSystem] {
            let Ok(addr) = Address::logical(device, port) else {
                assert_eq!((device, port), (LogicalDeviceKind::AudioSystem, 0));
                continue;
            };
            let parsed: Address = addr.to_string().parse().unwrap();
            assert_eq!(parsed, addr);
        }
    }
}

// ── Rejection ─────────────────────────────────────────────────────────────────

#[test]
fn test_documented_invalid_inputs_are_rejected() {
    for bad in ["16", "tv.16", "av", "1.2.3.4.5", "av.0"] {
        let result = bad.parse::<Address>();
        assert!(
            matches!(result, Err(AddressError::InvalidAddress(ref text)) if text == bad),
            "'{bad}' must yield InvalidAddress, got {result:?}"
        );
    }
}

// ── Config file representation ────────────────────────────────────────────────

#[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
struct Wrapper {
    port: Address,
}

#[test]
fn test_address_is_stored_as_text_in_toml() {
    // Arrange
    let wrapper = Wrapper {
        port: Address::logical(LogicalDeviceKind::Tv, 2).unwrap(),
    };

    // Act
    let text = toml::to_string(&wrapper).unwrap();
    let restored: Wrapper = toml::from_str(&text).unwrap();

    // Assert
    assert_eq!(text.trim(), r#"port = "tv.2""#);
    assert_eq!(restored, wrapper);
}

#[test]
fn test_invalid_address_in_toml_fails_to_deserialize() {
    let result: Result<Wrapper, _> = toml::from_str(r#"port = "av""#);
    assert!(result.is_err());
}
