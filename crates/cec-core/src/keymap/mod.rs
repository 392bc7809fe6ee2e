//! CEC button → Linux input key translation.
//!
//! The table is built once at startup and never changes.  Every possible
//! button byte has an entry; an empty slice means "this button does nothing".
//! Some buttons map to several keys pressed together, e.g. the diagonal
//! navigation buttons become two arrow keys.

pub mod linux_input;

use std::collections::BTreeSet;

use tracing::trace;

pub use linux_input::InputKey;

use crate::protocol::UserControlCode;

/// Immutable lookup table indexed by [`UserControlCode`].
#[derive(Debug, Clone)]
pub struct KeyMap {
    entries: Vec<Vec<InputKey>>,
}

impl KeyMap {
    /// Builds a table where every button maps to nothing.
    pub fn empty() -> Self {
        Self {
            entries: vec![Vec::new(); usize::from(u8::MAX) + 1],
        }
    }

    /// Builds the default remote layout.
    pub fn standard() -> Self {
        use InputKey as K;
        use UserControlCode as C;

        let mut map = Self::empty();
        let table: &[(UserControlCode, &[InputKey])] = &[
            (C::SELECT, &[K::KEY_ENTER]),
            (C::UP, &[K::KEY_UP]),
            (C::DOWN, &[K::KEY_DOWN]),
            (C::LEFT, &[K::KEY_LEFT]),
            (C::RIGHT, &[K::KEY_RIGHT]),
            (C::RIGHT_UP, &[K::KEY_RIGHT, K::KEY_UP]),
            (C::RIGHT_DOWN, &[K::KEY_RIGHT, K::KEY_DOWN]),
            (C::LEFT_UP, &[K::KEY_LEFT, K::KEY_UP]),
            (C::LEFT_DOWN, &[K::KEY_LEFT, K::KEY_DOWN]),
            (C::ROOT_MENU, &[K::KEY_HOMEPAGE]),
            (C::SETUP_MENU, &[K::KEY_SETUP]),
            (C::CONTENTS_MENU, &[K::KEY_MENU]),
            (C::FAVORITE_MENU, &[K::KEY_FAVORITES]),
            (C::EXIT, &[K::KEY_BACKSPACE]),
            (C::NUMBER0, &[K::KEY_0]),
            (C::NUMBER1, &[K::KEY_1]),
            (C::NUMBER2, &[K::KEY_2]),
            (C::NUMBER3, &[K::KEY_3]),
            (C::NUMBER4, &[K::KEY_4]),
            (C::NUMBER5, &[K::KEY_5]),
            (C::NUMBER6, &[K::KEY_6]),
            (C::NUMBER7, &[K::KEY_7]),
            (C::NUMBER8, &[K::KEY_8]),
            (C::NUMBER9, &[K::KEY_9]),
            (C::DOT, &[K::KEY_DOT]),
            (C::ENTER, &[K::KEY_ENTER]),
            (C::CLEAR, &[K::KEY_CLEAR]),
            (C::CHANNEL_UP, &[K::KEY_CHANNELUP]),
            (C::CHANNEL_DOWN, &[K::KEY_CHANNELDOWN]),
            (C::PREVIOUS_CHANNEL, &[K::KEY_LAST]),
            (C::DISPLAY_INFORMATION, &[K::KEY_INFO]),
            (C::HELP, &[K::KEY_HELP]),
            (C::PAGE_UP, &[K::KEY_PAGEUP]),
            (C::PAGE_DOWN, &[K::KEY_PAGEDOWN]),
            (C::POWER, &[K::KEY_POWER]),
            (C::VOLUME_UP, &[K::KEY_VOLUMEUP]),
            (C::VOLUME_DOWN, &[K::KEY_VOLUMEDOWN]),
            (C::MUTE, &[K::KEY_MUTE]),
            (C::PLAY, &[K::KEY_PLAY]),
            (C::STOP, &[K::KEY_STOP]),
            (C::PAUSE, &[K::KEY_PAUSE]),
            (C::RECORD, &[K::KEY_RECORD]),
            (C::REWIND, &[K::KEY_REWIND]),
            (C::FAST_FORWARD, &[K::KEY_FASTFORWARD]),
            (C::EJECT, &[K::KEY_EJECTCD]),
            (C::FORWARD, &[K::KEY_NEXTSONG]),
            (C::BACKWARD, &[K::KEY_PREVIOUSSONG]),
            (C::ANGLE, &[K::KEY_ANGLE]),
            (C::SUB_PICTURE, &[K::KEY_SUBTITLE]),
            (C::ELECTRONIC_PROGRAM_GUIDE, &[K::KEY_EPG]),
            (C::PAUSE_PLAY_FUNCTION, &[K::KEY_PLAYPAUSE]),
            (C::F1_BLUE, &[K::KEY_BLUE]),
            (C::F2_RED, &[K::KEY_RED]),
            (C::F3_GREEN, &[K::KEY_GREEN]),
            (C::F4_YELLOW, &[K::KEY_YELLOW]),
            (C::F5, &[K::KEY_F5]),
            (C::DATA, &[K::KEY_TEXT]),
            (C::AN_RETURN, &[K::KEY_BACK]),
        ];
        for (code, keys) in table {
            map.set(*code, keys.to_vec());
        }
        map
    }

    /// Replaces the keys for one button.
    pub fn set(&mut self, code: UserControlCode, keys: Vec<InputKey>) {
        trace!(%code, ?keys, "key map entry");
        self.entries[usize::from(code.0)] = keys;
    }

    /// Keys emitted for `code`, in press order.  Empty means unmapped.
    pub fn keys(&self, code: UserControlCode) -> &[InputKey] {
        &self.entries[usize::from(code.0)]
    }

    /// Every distinct key the table can emit.  The virtual input device has to
    /// declare these before it is created.
    pub fn all_keys(&self) -> BTreeSet<InputKey> {
        self.entries.iter().flatten().copied().collect()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::standard()
    }
}
