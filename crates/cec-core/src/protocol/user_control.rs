//! CEC "user control" codes: the button identifiers a remote sends.
//!
//! The code is a single byte on the wire.  Only part of the range is assigned
//! by the HDMI specification; the rest still has to be representable because
//! vendors send whatever they like.

use std::fmt;

/// A remote-control button code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserControlCode(pub u8);

impl UserControlCode {
    pub const SELECT: Self = Self(0x00);
    pub const UP: Self = Self(0x01);
    pub const DOWN: Self = Self(0x02);
    pub const LEFT: Self = Self(0x03);
    pub const RIGHT: Self = Self(0x04);
    pub const RIGHT_UP: Self = Self(0x05);
    pub const RIGHT_DOWN: Self = Self(0x06);
    pub const LEFT_UP: Self = Self(0x07);
    pub const LEFT_DOWN: Self = Self(0x08);
    pub const ROOT_MENU: Self = Self(0x09);
    pub const SETUP_MENU: Self = Self(0x0A);
    pub const CONTENTS_MENU: Self = Self(0x0B);
    pub const FAVORITE_MENU: Self = Self(0x0C);
    pub const EXIT: Self = Self(0x0D);
    pub const TOP_MENU: Self = Self(0x10);
    pub const DVD_MENU: Self = Self(0x11);
    pub const NUMBER_ENTRY_MODE: Self = Self(0x1D);
    pub const NUMBER11: Self = Self(0x1E);
    pub const NUMBER12: Self = Self(0x1F);
    pub const NUMBER0: Self = Self(0x20);
    pub const NUMBER1: Self = Self(0x21);
    pub const NUMBER2: Self = Self(0x22);
    pub const NUMBER3: Self = Self(0x23);
    pub const NUMBER4: Self = Self(0x24);
    pub const NUMBER5: Self = Self(0x25);
    pub const NUMBER6: Self = Self(0x26);
    pub const NUMBER7: Self = Self(0x27);
    pub const NUMBER8: Self = Self(0x28);
    pub const NUMBER9: Self = Self(0x29);
    pub const DOT: Self = Self(0x2A);
    pub const ENTER: Self = Self(0x2B);
    pub const CLEAR: Self = Self(0x2C);
    pub const NEXT_FAVORITE: Self = Self(0x2F);
    pub const CHANNEL_UP: Self = Self(0x30);
    pub const CHANNEL_DOWN: Self = Self(0x31);
    pub const PREVIOUS_CHANNEL: Self = Self(0x32);
    pub const SOUND_SELECT: Self = Self(0x33);
    pub const INPUT_SELECT: Self = Self(0x34);
    pub const DISPLAY_INFORMATION: Self = Self(0x35);
    pub const HELP: Self = Self(0x36);
    pub const PAGE_UP: Self = Self(0x37);
    pub const PAGE_DOWN: Self = Self(0x38);
    pub const POWER: Self = Self(0x40);
    pub const VOLUME_UP: Self = Self(0x41);
    pub const VOLUME_DOWN: Self = Self(0x42);
    pub const MUTE: Self = Self(0x43);
    pub const PLAY: Self = Self(0x44);
    pub const STOP: Self = Self(0x45);
    pub const PAUSE: Self = Self(0x46);
    pub const RECORD: Self = Self(0x47);
    pub const REWIND: Self = Self(0x48);
    pub const FAST_FORWARD: Self = Self(0x49);
    pub const EJECT: Self = Self(0x4A);
    pub const FORWARD: Self = Self(0x4B);
    pub const BACKWARD: Self = Self(0x4C);
    pub const STOP_RECORD: Self = Self(0x4D);
    pub const PAUSE_RECORD: Self = Self(0x4E);
    pub const ANGLE: Self = Self(0x50);
    pub const SUB_PICTURE: Self = Self(0x51);
    pub const VIDEO_ON_DEMAND: Self = Self(0x52);
    pub const ELECTRONIC_PROGRAM_GUIDE: Self = Self(0x53);
    pub const TIMER_PROGRAMMING: Self = Self(0x54);
    pub const INITIAL_CONFIGURATION: Self = Self(0x55);
    pub const SELECT_BROADCAST_TYPE: Self = Self(0x56);
    pub const SELECT_SOUND_PRESENTATION: Self = Self(0x57);
    pub const PLAY_FUNCTION: Self = Self(0x60);
    pub const PAUSE_PLAY_FUNCTION: Self = Self(0x61);
    pub const RECORD_FUNCTION: Self = Self(0x62);
    pub const PAUSE_RECORD_FUNCTION: Self = Self(0x63);
    pub const STOP_FUNCTION: Self = Self(0x64);
    pub const MUTE_FUNCTION: Self = Self(0x65);
    pub const RESTORE_VOLUME_FUNCTION: Self = Self(0x66);
    pub const TUNE_FUNCTION: Self = Self(0x67);
    pub const SELECT_MEDIA_FUNCTION: Self = Self(0x68);
    pub const SELECT_AV_INPUT_FUNCTION: Self = Self(0x69);
    pub const SELECT_AUDIO_INPUT_FUNCTION: Self = Self(0x6A);
    pub const POWER_TOGGLE_FUNCTION: Self = Self(0x6B);
    pub const POWER_OFF_FUNCTION: Self = Self(0x6C);
    pub const POWER_ON_FUNCTION: Self = Self(0x6D);
    pub const F1_BLUE: Self = Self(0x71);
    pub const F2_RED: Self = Self(0x72);
    pub const F3_GREEN: Self = Self(0x73);
    pub const F4_YELLOW: Self = Self(0x74);
    pub const F5: Self = Self(0x75);
    pub const DATA: Self = Self(0x76);
    pub const AN_RETURN: Self = Self(0x91);
    pub const AN_CHANNELS_LIST: Self = Self(0x96);

    /// The driver's "no valid code" marker.
    pub const UNKNOWN: Self = Self(0xFF);

    /// Symbolic name for log output, `None` for unassigned codes.
    pub fn name(self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for UserControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("UNKNOWN"))
    }
}

const NAMES: &[(UserControlCode, &str)] = &[
    (UserControlCode::SELECT, "SELECT"),
    (UserControlCode::UP, "UP"),
    (UserControlCode::DOWN, "DOWN"),
    (UserControlCode::LEFT, "LEFT"),
    (UserControlCode::RIGHT, "RIGHT"),
    (UserControlCode::RIGHT_UP, "RIGHT_UP"),
    (UserControlCode::RIGHT_DOWN, "RIGHT_DOWN"),
    (UserControlCode::LEFT_UP, "LEFT_UP"),
    (UserControlCode::LEFT_DOWN, "LEFT_DOWN"),
    (UserControlCode::ROOT_MENU, "ROOT_MENU"),
    (UserControlCode::SETUP_MENU, "SETUP_MENU"),
    (UserControlCode::CONTENTS_MENU, "CONTENTS_MENU"),
    (UserControlCode::FAVORITE_MENU, "FAVORITE_MENU"),
    (UserControlCode::EXIT, "EXIT"),
    (UserControlCode::TOP_MENU, "TOP_MENU"),
    (UserControlCode::DVD_MENU, "DVD_MENU"),
    (UserControlCode::NUMBER_ENTRY_MODE, "NUMBER_ENTRY_MODE"),
    (UserControlCode::NUMBER11, "NUMBER11"),
    (UserControlCode::NUMBER12, "NUMBER12"),
    (UserControlCode::NUMBER0, "NUMBER0"),
    (UserControlCode::NUMBER1, "NUMBER1"),
    (UserControlCode::NUMBER2, "NUMBER2"),
    (UserControlCode::NUMBER3, "NUMBER3"),
    (UserControlCode::NUMBER4, "NUMBER4"),
    (UserControlCode::NUMBER5, "NUMBER5"),
    (UserControlCode::NUMBER6, "NUMBER6"),
    (UserControlCode::NUMBER7, "NUMBER7"),
    (UserControlCode::NUMBER8, "NUMBER8"),
    (UserControlCode::NUMBER9, "NUMBER9"),
    (UserControlCode::DOT, "DOT"),
    (UserControlCode::ENTER, "ENTER"),
    (UserControlCode::CLEAR, "CLEAR"),
    (UserControlCode::NEXT_FAVORITE, "NEXT_FAVORITE"),
    (UserControlCode::CHANNEL_UP, "CHANNEL_UP"),
    (UserControlCode::CHANNEL_DOWN, "CHANNEL_DOWN"),
    (UserControlCode::PREVIOUS_CHANNEL, "PREVIOUS_CHANNEL"),
    (UserControlCode::SOUND_SELECT, "SOUND_SELECT"),
    (UserControlCode::INPUT_SELECT, "INPUT_SELECT"),
    (UserControlCode::DISPLAY_INFORMATION, "DISPLAY_INFORMATION"),
    (UserControlCode::HELP, "HELP"),
    (UserControlCode::PAGE_UP, "PAGE_UP"),
    (UserControlCode::PAGE_DOWN, "PAGE_DOWN"),
    (UserControlCode::POWER, "POWER"),
    (UserControlCode::VOLUME_UP, "VOLUME_UP"),
    (UserControlCode::VOLUME_DOWN, "VOLUME_DOWN"),
    (UserControlCode::MUTE, "MUTE"),
    (UserControlCode::PLAY, "PLAY"),
    (UserControlCode::STOP, "STOP"),
    (UserControlCode::PAUSE, "PAUSE"),
    (UserControlCode::RECORD, "RECORD"),
    (UserControlCode::REWIND, "REWIND"),
    (UserControlCode::FAST_FORWARD, "FAST_FORWARD"),
    (UserControlCode::EJECT, "EJECT"),
    (UserControlCode::FORWARD, "FORWARD"),
    (UserControlCode::BACKWARD, "BACKWARD"),
    (UserControlCode::STOP_RECORD, "STOP_RECORD"),
    (UserControlCode::PAUSE_RECORD, "PAUSE_RECORD"),
    (UserControlCode::ANGLE, "ANGLE"),
    (UserControlCode::SUB_PICTURE, "SUB_PICTURE"),
    (UserControlCode::VIDEO_ON_DEMAND, "VIDEO_ON_DEMAND"),
    (UserControlCode::ELECTRONIC_PROGRAM_GUIDE, "ELECTRONIC_PROGRAM_GUIDE"),
    (UserControlCode::TIMER_PROGRAMMING, "TIMER_PROGRAMMING"),
    (UserControlCode::INITIAL_CONFIGURATION, "INITIAL_CONFIGURATION"),
    (UserControlCode::SELECT_BROADCAST_TYPE, "SELECT_BROADCAST_TYPE"),
    (UserControlCode::SELECT_SOUND_PRESENTATION, "SELECT_SOUND_PRESENTATION"),
    (UserControlCode::PLAY_FUNCTION, "PLAY_FUNCTION"),
    (UserControlCode::PAUSE_PLAY_FUNCTION, "PAUSE_PLAY_FUNCTION"),
    (UserControlCode::RECORD_FUNCTION, "RECORD_FUNCTION"),
    (UserControlCode::PAUSE_RECORD_FUNCTION, "PAUSE_RECORD_FUNCTION"),
    (UserControlCode::STOP_FUNCTION, "STOP_FUNCTION"),
    (UserControlCode::MUTE_FUNCTION, "MUTE_FUNCTION"),
    (UserControlCode::RESTORE_VOLUME_FUNCTION, "RESTORE_VOLUME_FUNCTION"),
    (UserControlCode::TUNE_FUNCTION, "TUNE_FUNCTION"),
    (UserControlCode::SELECT_MEDIA_FUNCTION, "SELECT_MEDIA_FUNCTION"),
    (UserControlCode::SELECT_AV_INPUT_FUNCTION, "SELECT_AV_INPUT_FUNCTION"),
    (UserControlCode::SELECT_AUDIO_INPUT_FUNCTION, "SELECT_AUDIO_INPUT_FUNCTION"),
    (UserControlCode::POWER_TOGGLE_FUNCTION, "POWER_TOGGLE_FUNCTION"),
    (UserControlCode::POWER_OFF_FUNCTION, "POWER_OFF_FUNCTION"),
    (UserControlCode::POWER_ON_FUNCTION, "POWER_ON_FUNCTION"),
    (UserControlCode::F1_BLUE, "F1_BLUE"),
    (UserControlCode::F2_RED, "F2_RED"),
    (UserControlCode::F3_GREEN, "F3_GREEN"),
    (UserControlCode::F4_YELLOW, "F4_YELLOW"),
    (UserControlCode::F5, "F5"),
    (UserControlCode::DATA, "DATA"),
    (UserControlCode::AN_RETURN, "AN_RETURN"),
    (UserControlCode::AN_CHANNELS_LIST, "AN_CHANNELS_LIST"),
];
