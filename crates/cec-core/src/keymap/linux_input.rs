//! Linux input key codes (`KEY_*` from `linux/input-event-codes.h`).
//!
//! Only the keys a TV remote can reasonably produce are named here; the
//! virtual input device registers exactly the keys the [`KeyMap`] emits.
//!
//! [`KeyMap`]: super::KeyMap

use std::fmt;

/// A Linux `EV_KEY` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputKey(pub u16);

impl InputKey {
    pub const KEY_ESC: Self = Self(1);
    pub const KEY_1: Self = Self(2);
    pub const KEY_2: Self = Self(3);
    pub const KEY_3: Self = Self(4);
    pub const KEY_4: Self = Self(5);
    pub const KEY_5: Self = Self(6);
    pub const KEY_6: Self = Self(7);
    pub const KEY_7: Self = Self(8);
    pub const KEY_8: Self = Self(9);
    pub const KEY_9: Self = Self(10);
    pub const KEY_0: Self = Self(11);
    pub const KEY_BACKSPACE: Self = Self(14);
    pub const KEY_ENTER: Self = Self(28);
    pub const KEY_DOT: Self = Self(52);
    pub const KEY_F5: Self = Self(63);
    pub const KEY_UP: Self = Self(103);
    pub const KEY_PAGEUP: Self = Self(104);
    pub const KEY_LEFT: Self = Self(105);
    pub const KEY_RIGHT: Self = Self(106);
    pub const KEY_DOWN: Self = Self(108);
    pub const KEY_PAGEDOWN: Self = Self(109);
    pub const KEY_MUTE: Self = Self(113);
    pub const KEY_VOLUMEDOWN: Self = Self(114);
    pub const KEY_VOLUMEUP: Self = Self(115);
    pub const KEY_POWER: Self = Self(116);
    pub const KEY_PAUSE: Self = Self(119);
    pub const KEY_STOP: Self = Self(128);
    pub const KEY_HELP: Self = Self(138);
    pub const KEY_MENU: Self = Self(139);
    pub const KEY_SETUP: Self = Self(141);
    pub const KEY_BACK: Self = Self(158);
    pub const KEY_EJECTCD: Self = Self(161);
    pub const KEY_NEXTSONG: Self = Self(163);
    pub const KEY_PLAYPAUSE: Self = Self(164);
    pub const KEY_PREVIOUSSONG: Self = Self(165);
    pub const KEY_RECORD: Self = Self(167);
    pub const KEY_REWIND: Self = Self(168);
    pub const KEY_HOMEPAGE: Self = Self(172);
    pub const KEY_EXIT: Self = Self(174);
    pub const KEY_PLAY: Self = Self(207);
    pub const KEY_FASTFORWARD: Self = Self(208);
    pub const KEY_CLEAR: Self = Self(355);
    pub const KEY_INFO: Self = Self(358);
    pub const KEY_FAVORITES: Self = Self(364);
    pub const KEY_EPG: Self = Self(365);
    pub const KEY_SUBTITLE: Self = Self(370);
    pub const KEY_ANGLE: Self = Self(371);
    pub const KEY_TEXT: Self = Self(388);
    pub const KEY_RED: Self = Self(398);
    pub const KEY_GREEN: Self = Self(399);
    pub const KEY_YELLOW: Self = Self(400);
    pub const KEY_BLUE: Self = Self(401);
    pub const KEY_CHANNELUP: Self = Self(402);
    pub const KEY_CHANNELDOWN: Self = Self(403);
    pub const KEY_LAST: Self = Self(405);

    pub const fn code(self) -> u16 {
        self.0
    }
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key {}", self.0)
    }
}
