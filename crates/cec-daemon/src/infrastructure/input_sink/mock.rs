//! Recording input sink for unit and integration tests.
//!
//! # Why a mock sink?
//!
//! The real sink creates a device under `/dev/uinput`, which needs root (or
//! an udev rule) and injects real key presses into the desktop session of the
//! machine running the tests.
//!
//! `MockInputSink` records every call instead, in order, in one
//! `Mutex<Vec<SinkEvent>>`.  Keeping key events and syncs in a single list
//! lets tests assert exactly where each batch ends.
//!
//! ```ignore
//! let sink = Arc::new(MockInputSink::new());
//! let mut keys = KeyRepeat::new(Arc::new(KeyMap::standard()), sink.clone());
//!
//! keys.handle(Keypress::down(UserControlCode::UP)).unwrap();
//!
//! assert_eq!(sink.pressed(), vec![InputKey::KEY_UP]);
//! ```

use std::sync::Mutex;

use cec_core::InputKey;

use crate::application::key_repeat::{InputSink, KeyValue, SinkError};

/// One recorded call on the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Key(InputKey, KeyValue),
    Sync,
}

/// A sink that records events without touching the kernel.
#[derive(Default)]
pub struct MockInputSink {
    pub events: Mutex<Vec<SinkEvent>>,
    /// When `true`, every method returns `SinkError::Write` and records nothing.
    pub should_fail: bool,
}

impl MockInputSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Keys that received a `Press`, in order.
    pub fn pressed(&self) -> Vec<InputKey> {
        self.with_value(KeyValue::Press)
    }

    /// Keys that received a `Release`, in order.
    pub fn released(&self) -> Vec<InputKey> {
        self.with_value(KeyValue::Release)
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn with_value(&self, wanted: KeyValue) -> Vec<InputKey> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match *event {
                SinkEvent::Key(key, value) if value == wanted => Some(key),
                _ => None,
            })
            .collect()
    }
}

impl InputSink for MockInputSink {
    fn send_key(&self, key: InputKey, value: KeyValue) -> Result<(), SinkError> {
        if self.should_fail {
            return Err(SinkError::Write("mock failure".to_string()));
        }
        self.events.lock().unwrap().push(SinkEvent::Key(key, value));
        Ok(())
    }

    fn sync(&self) -> Result<(), SinkError> {
        if self.should_fail {
            return Err(SinkError::Write("mock failure".to_string()));
        }
        self.events.lock().unwrap().push(SinkEvent::Sync);
        Ok(())
    }
}
