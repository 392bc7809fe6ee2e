//! CEC opcodes and the operand values the daemon inspects.

use std::fmt;

/// A CEC message opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(pub u8);

impl Opcode {
    pub const FEATURE_ABORT: Self = Self(0x00);
    pub const IMAGE_VIEW_ON: Self = Self(0x04);
    pub const TEXT_VIEW_ON: Self = Self(0x0D);
    pub const SET_MENU_LANGUAGE: Self = Self(0x32);
    pub const STANDBY: Self = Self(0x36);
    pub const PLAY: Self = Self(0x41);
    pub const DECK_CONTROL: Self = Self(0x42);
    pub const USER_CONTROL_PRESSED: Self = Self(0x44);
    pub const USER_CONTROL_RELEASE: Self = Self(0x45);
    pub const GIVE_OSD_NAME: Self = Self(0x46);
    pub const SET_OSD_NAME: Self = Self(0x47);
    pub const ROUTING_CHANGE: Self = Self(0x80);
    pub const ACTIVE_SOURCE: Self = Self(0x82);
    pub const GIVE_PHYSICAL_ADDRESS: Self = Self(0x83);
    pub const REPORT_PHYSICAL_ADDRESS: Self = Self(0x84);
    pub const REQUEST_ACTIVE_SOURCE: Self = Self(0x85);
    pub const SET_STREAM_PATH: Self = Self(0x86);
    pub const DEVICE_VENDOR_ID: Self = Self(0x87);
    pub const GIVE_DEVICE_VENDOR_ID: Self = Self(0x8C);
    pub const MENU_REQUEST: Self = Self(0x8D);
    pub const MENU_STATUS: Self = Self(0x8E);
    pub const GIVE_DEVICE_POWER_STATUS: Self = Self(0x8F);
    pub const REPORT_POWER_STATUS: Self = Self(0x90);
    pub const CEC_VERSION: Self = Self(0x9E);
    pub const GET_CEC_VERSION: Self = Self(0x9F);
    pub const VENDOR_COMMAND_WITH_ID: Self = Self(0xA0);

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::FEATURE_ABORT => "FEATURE_ABORT",
            Self::IMAGE_VIEW_ON => "IMAGE_VIEW_ON",
            Self::TEXT_VIEW_ON => "TEXT_VIEW_ON",
            Self::SET_MENU_LANGUAGE => "SET_MENU_LANGUAGE",
            Self::STANDBY => "STANDBY",
            Self::PLAY => "PLAY",
            Self::DECK_CONTROL => "DECK_CONTROL",
            Self::USER_CONTROL_PRESSED => "USER_CONTROL_PRESSED",
            Self::USER_CONTROL_RELEASE => "USER_CONTROL_RELEASE",
            Self::GIVE_OSD_NAME => "GIVE_OSD_NAME",
            Self::SET_OSD_NAME => "SET_OSD_NAME",
            Self::ROUTING_CHANGE => "ROUTING_CHANGE",
            Self::ACTIVE_SOURCE => "ACTIVE_SOURCE",
            Self::GIVE_PHYSICAL_ADDRESS => "GIVE_PHYSICAL_ADDRESS",
            Self::REPORT_PHYSICAL_ADDRESS => "REPORT_PHYSICAL_ADDRESS",
            Self::REQUEST_ACTIVE_SOURCE => "REQUEST_ACTIVE_SOURCE",
            Self::SET_STREAM_PATH => "SET_STREAM_PATH",
            Self::DEVICE_VENDOR_ID => "DEVICE_VENDOR_ID",
            Self::GIVE_DEVICE_VENDOR_ID => "GIVE_DEVICE_VENDOR_ID",
            Self::MENU_REQUEST => "MENU_REQUEST",
            Self::MENU_STATUS => "MENU_STATUS",
            Self::GIVE_DEVICE_POWER_STATUS => "GIVE_DEVICE_POWER_STATUS",
            Self::REPORT_POWER_STATUS => "REPORT_POWER_STATUS",
            Self::CEC_VERSION => "CEC_VERSION",
            Self::GET_CEC_VERSION => "GET_CEC_VERSION",
            Self::VENDOR_COMMAND_WITH_ID => "VENDOR_COMMAND_WITH_ID",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "opcode 0x{:02x}", self.0),
        }
    }
}

/// Operand of `DECK_CONTROL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckControlMode {
    SkipForward,
    SkipReverse,
    Stop,
    Eject,
}

impl DeckControlMode {
    pub fn from_operand(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::SkipForward),
            0x02 => Some(Self::SkipReverse),
            0x03 => Some(Self::Stop),
            0x04 => Some(Self::Eject),
            _ => None,
        }
    }
}

/// Operand of `PLAY`.  Only the two modes the daemon reacts to are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Forward,
    Still,
    Other(u8),
}

impl PlayMode {
    pub fn from_operand(value: u8) -> Self {
        match value {
            0x24 => Self::Forward,
            0x25 => Self::Still,
            other => Self::Other(other),
        }
    }
}
