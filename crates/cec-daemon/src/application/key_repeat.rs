//! Key press / hold / repeat / release state machine.
//!
//! CEC reports buttons as a stream of "down" notifications (duration 0, sent
//! once on press and then periodically while held) followed by one "released
//! after N ms" notification.  Linux input wants discrete press, repeat and
//! release events.  [`KeyRepeat`] bridges the two:
//!
//! ```text
//!   down(A)          held = {}   → press A            held = {A}
//!   down(A)          held = {A}  → repeat A           held = {A}
//!   down(B)          held = {A}  → release A, press B held = {B}
//!   released(B, ms)  held = {B}  → release B          held = {}
//!   released(C, ms)  held = {B}  → release B, wait, press C, release C
//! ```
//!
//! The last row covers remotes that never send the "down" for a short tap.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cec_core::{InputKey, KeyMap, Keypress, UserControlCode};
use thiserror::Error;
use tracing::{debug, trace};

/// Pause between releasing the old keys and pressing the new ones when a
/// release arrives for a key that was never reported down.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Held duration used for synthesized taps.
pub const SYNTHETIC_TAP: Duration = Duration::from_millis(100);

/// EV_KEY event value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum KeyValue {
    Release = 0,
    Press = 1,
    Repeat = 2,
}

/// Error type for virtual input device writes.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create virtual input device: {0}")]
    Create(String),
    #[error("failed to write input event: {0}")]
    Write(String),
}

/// Destination for key events, usually a kernel virtual input device.
///
/// Events passed to [`send_key`](Self::send_key) may be buffered until the
/// next [`sync`](Self::sync).
pub trait InputSink: Send + Sync {
    fn send_key(&self, key: InputKey, value: KeyValue) -> Result<(), SinkError>;

    /// Marks the end of an event batch.
    fn sync(&self) -> Result<(), SinkError>;
}

/// Tracks which keys are held and turns CEC keypresses into sink events.
///
/// Owned by the consumer thread; never shared.
pub struct KeyRepeat {
    keymap: Arc<KeyMap>,
    sink: Arc<dyn InputSink>,
    held: Vec<InputKey>,
    settle_delay: Duration,
}

impl KeyRepeat {
    pub fn new(keymap: Arc<KeyMap>, sink: Arc<dyn InputSink>) -> Self {
        Self {
            keymap,
            sink,
            held: Vec::new(),
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Overrides the settle delay.  Tests use zero.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Keys currently held down, in map order.
    pub fn held_keys(&self) -> &[InputKey] {
        &self.held
    }

    /// Forgets held keys without emitting releases.
    ///
    /// Used at the start of a connection cycle; the input device itself is
    /// long-lived, so anything still held was already released on close.
    pub fn reset(&mut self) {
        self.held.clear();
    }

    /// Releases everything still held.  Called before the adapter closes.
    pub fn release_all(&mut self) -> Result<(), SinkError> {
        if self.held.is_empty() {
            return Ok(());
        }
        let held = std::mem::take(&mut self.held);
        self.emit(&held, KeyValue::Release)?;
        self.sink.sync()
    }

    /// Processes one keypress notification from the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the input device rejects a write.  `held`
    /// already reflects the new state in that case.
    pub fn handle(&mut self, keypress: Keypress) -> Result<(), SinkError> {
        let keys = self.keymap.keys(keypress.keycode).to_vec();
        if keys.is_empty() {
            trace!(keycode = %keypress.keycode, "no mapping; ignoring key");
            return Ok(());
        }

        if !keypress.is_release() {
            if keys == self.held {
                debug!(keycode = %keypress.keycode, "repeat");
                self.emit(&keys, KeyValue::Repeat)?;
            } else {
                let previous = std::mem::replace(&mut self.held, keys.clone());
                if !previous.is_empty() {
                    self.emit(&previous, KeyValue::Release)?;
                }
                debug!(keycode = %keypress.keycode, "press");
                self.emit(&keys, KeyValue::Press)?;
            }
            return self.sink.sync();
        }

        let previous = std::mem::take(&mut self.held);
        if keys != previous {
            if !previous.is_empty() {
                self.emit(&previous, KeyValue::Release)?;
                self.sink.sync()?;
            }
            thread::sleep(self.settle_delay);
            self.emit(&keys, KeyValue::Press)?;
            self.sink.sync()?;
        }
        let held_ms = u64::try_from(keypress.duration.as_millis()).unwrap_or(u64::MAX);
        debug!(keycode = %keypress.keycode, held_ms, "release");
        self.emit(&keys, KeyValue::Release)?;
        self.sink.sync()
    }

    /// Synthesizes a complete tap of `keycode`: down, then released after
    /// [`SYNTHETIC_TAP`].
    pub fn tap(&mut self, keycode: UserControlCode) -> Result<(), SinkError> {
        self.handle(Keypress::down(keycode))?;
        self.handle(Keypress::released(keycode, SYNTHETIC_TAP))
    }

    fn emit(&self, keys: &[InputKey], value: KeyValue) -> Result<(), SinkError> {
        keys.iter()
            .try_for_each(|&key| self.sink.send_key(key, value))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::input_sink::mock::{MockInputSink, SinkEvent};

    fn machine() -> (KeyRepeat, Arc<MockInputSink>) {
        let sink = Arc::new(MockInputSink::new());
        let repeat = KeyRepeat::new(Arc::new(KeyMap::standard()), sink.clone())
            .with_settle_delay(Duration::ZERO);
        (repeat, sink)
    }

    fn key(code: InputKey, value: KeyValue) -> SinkEvent {
        SinkEvent::Key(code, value)
    }

    #[test]
    fn test_second_down_of_same_key_emits_repeat() {
        // Arrange
        let (mut repeat, sink) = machine();

        // Act
        repeat.handle(Keypress::down(UserControlCode::SELECT)).unwrap();
        repeat.handle(Keypress::down(UserControlCode::SELECT)).unwrap();

        // Assert
        assert_eq!(
            sink.events(),
            vec![
                key(InputKey::KEY_ENTER, KeyValue::Press),
                SinkEvent::Sync,
                key(InputKey::KEY_ENTER, KeyValue::Repeat),
                SinkEvent::Sync,
            ]
        );
        assert_eq!(repeat.held_keys(), &[InputKey::KEY_ENTER]);
    }

    #[test]
    fn test_switching_keys_releases_old_before_pressing_new() {
        // Arrange
        let (mut repeat, sink) = machine();
        repeat.handle(Keypress::down(UserControlCode::UP)).unwrap();
        sink.clear();

        // Act
        repeat.handle(Keypress::down(UserControlCode::DOWN)).unwrap();

        // Assert
        assert_eq!(
            sink.events(),
            vec![
                key(InputKey::KEY_UP, KeyValue::Release),
                key(InputKey::KEY_DOWN, KeyValue::Press),
                SinkEvent::Sync,
            ]
        );
        assert_eq!(repeat.held_keys(), &[InputKey::KEY_DOWN]);
    }

    #[test]
    fn test_release_of_held_key_emits_only_release() {
        let (mut repeat, sink) = machine();
        repeat.handle(Keypress::down(UserControlCode::LEFT)).unwrap();
        sink.clear();

        repeat
            .handle(Keypress::released(UserControlCode::LEFT, Duration::from_millis(250)))
            .unwrap();

        assert_eq!(
            sink.events(),
            vec![key(InputKey::KEY_LEFT, KeyValue::Release), SinkEvent::Sync]
        );
        assert!(repeat.held_keys().is_empty());
    }

    #[test]
    fn test_release_without_down_synthesizes_press_first() {
        // Arrange
        let (mut repeat, sink) = machine();
        repeat.handle(Keypress::down(UserControlCode::UP)).unwrap();
        sink.clear();

        // Act
        repeat
            .handle(Keypress::released(UserControlCode::RIGHT, Duration::from_millis(80)))
            .unwrap();

        // Assert
        assert_eq!(
            sink.events(),
            vec![
                key(InputKey::KEY_UP, KeyValue::Release),
                SinkEvent::Sync,
                key(InputKey::KEY_RIGHT, KeyValue::Press),
                SinkEvent::Sync,
                key(InputKey::KEY_RIGHT, KeyValue::Release),
                SinkEvent::Sync,
            ]
        );
        assert!(repeat.held_keys().is_empty());
    }

    #[test]
    fn test_release_after_overlong_hold_still_emits_release() {
        // Arrange: a debug subscriber so the hold time is actually formatted.
        let (mut repeat, sink) = machine();
        repeat.handle(Keypress::down(UserControlCode::DOWN)).unwrap();
        sink.clear();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();

        // Act
        tracing::subscriber::with_default(subscriber, || {
            repeat
                .handle(Keypress::released(UserControlCode::DOWN, Duration::MAX))
                .unwrap();
        });

        // Assert
        assert_eq!(
            sink.events(),
            vec![key(InputKey::KEY_DOWN, KeyValue::Release), SinkEvent::Sync]
        );
    }

    #[test]
    fn test_release_from_idle_skips_the_empty_release() {
        let (mut repeat, sink) = machine();

        repeat
            .handle(Keypress::released(UserControlCode::PLAY, Duration::from_millis(80)))
            .unwrap();

        assert_eq!(
            sink.events(),
            vec![
                key(InputKey::KEY_PLAY, KeyValue::Press),
                SinkEvent::Sync,
                key(InputKey::KEY_PLAY, KeyValue::Release),
                SinkEvent::Sync,
            ]
        );
    }

    #[test]
    fn test_chorded_key_presses_every_mapped_key_in_order() {
        let (mut repeat, sink) = machine();

        repeat.handle(Keypress::down(UserControlCode::RIGHT_UP)).unwrap();

        assert_eq!(
            sink.events(),
            vec![
                key(InputKey::KEY_RIGHT, KeyValue::Press),
                key(InputKey::KEY_UP, KeyValue::Press),
                SinkEvent::Sync,
            ]
        );
    }

    #[test]
    fn test_unmapped_key_changes_nothing() {
        // Arrange
        let (mut repeat, sink) = machine();
        repeat.handle(Keypress::down(UserControlCode::UP)).unwrap();
        sink.clear();

        // Act
        repeat.handle(Keypress::down(UserControlCode::UNKNOWN)).unwrap();

        // Assert
        assert!(sink.events().is_empty());
        assert_eq!(repeat.held_keys(), &[InputKey::KEY_UP]);
    }

    #[test]
    fn test_tap_emits_press_then_release() {
        let (mut repeat, sink) = machine();

        repeat.tap(UserControlCode::POWER).unwrap();

        assert_eq!(
            sink.events(),
            vec![
                key(InputKey::KEY_POWER, KeyValue::Press),
                SinkEvent::Sync,
                key(InputKey::KEY_POWER, KeyValue::Release),
                SinkEvent::Sync,
            ]
        );
    }

    #[test]
    fn test_release_all_clears_held_keys() {
        let (mut repeat, sink) = machine();
        repeat.handle(Keypress::down(UserControlCode::DOWN)).unwrap();
        sink.clear();

        repeat.release_all().unwrap();
        repeat.release_all().unwrap();

        assert_eq!(
            sink.events(),
            vec![key(InputKey::KEY_DOWN, KeyValue::Release), SinkEvent::Sync]
        );
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let sink = Arc::new(MockInputSink::failing());
        let mut repeat = KeyRepeat::new(Arc::new(KeyMap::standard()), sink);

        let result = repeat.handle(Keypress::down(UserControlCode::UP));

        assert!(matches!(result, Err(SinkError::Write(_))));
    }
}
