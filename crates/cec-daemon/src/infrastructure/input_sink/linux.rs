//! Linux virtual keyboard via `/dev/uinput`.
//!
//! # What is uinput? (for beginners)
//!
//! `uinput` is a kernel module that lets a user-space process create an input
//! device.  Events written to it are delivered to the rest of the system
//! (X11, Wayland compositors, the console) exactly like events from a real
//! USB keyboard.  The device has to declare up front which key codes it can
//! send, so the constructor takes every key the [`KeyMap`] can produce.
//!
//! The `evdev` crate wraps the ioctls: `VirtualDeviceBuilder` creates the
//! device and `VirtualDevice::emit` writes a batch of events followed by a
//! `SYN_REPORT`.  [`UinputSink`] therefore buffers events from
//! [`InputSink::send_key`] and hands them to `emit` on [`InputSink::sync`].
//!
//! # Permissions
//!
//! Opening `/dev/uinput` usually needs root, or membership of a group granted
//! access by an udev rule.  Without it the constructor fails with
//! [`SinkError::Create`].

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use cec_core::{InputKey, KeyMap};
use evdev::{uinput::VirtualDeviceBuilder, AttributeSet, EventType, InputEvent, Key};
use tracing::{debug, info};

use crate::application::key_repeat::{InputSink, KeyValue, SinkError};

/// Name the virtual device shows up under in `/proc/bus/input/devices`.
pub const DEVICE_NAME: &str = "cec-daemon";

/// Newly created devices drop events sent before userspace (udev, the
/// compositor) has picked them up.
const SETTLE_AFTER_CREATE: Duration = Duration::from_secs(1);

/// Virtual keyboard backed by a uinput device.
pub struct UinputSink {
    device: Mutex<evdev::uinput::VirtualDevice>,
    pending: Mutex<Vec<InputEvent>>,
}

impl UinputSink {
    /// Creates a virtual keyboard able to send every key in `keymap`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Create`] if `/dev/uinput` cannot be opened or the
    /// device cannot be registered.
    pub fn new(keymap: &KeyMap) -> Result<Self, SinkError> {
        let mut keys = AttributeSet::<Key>::new();
        for key in keymap.all_keys() {
            keys.insert(Key::new(key.code()));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(|e| SinkError::Create(format!("open /dev/uinput: {e}")))?
            .name(DEVICE_NAME)
            .with_keys(&keys)
            .map_err(|e| SinkError::Create(format!("declare keys: {e}")))?
            .build()
            .map_err(|e| SinkError::Create(format!("register device: {e}")))?;

        info!(name = DEVICE_NAME, keys = keys.iter().count(), "created virtual input device");
        thread::sleep(SETTLE_AFTER_CREATE);

        Ok(Self {
            device: Mutex::new(device),
            pending: Mutex::new(Vec::new()),
        })
    }
}

impl InputSink for UinputSink {
    fn send_key(&self, key: InputKey, value: KeyValue) -> Result<(), SinkError> {
        debug!(%key, ?value, "queue input event");
        self.pending
            .lock()
            .map_err(|_| SinkError::Write("event buffer poisoned".to_string()))?
            .push(InputEvent::new(EventType::KEY, key.code(), value as i32));
        Ok(())
    }

    fn sync(&self) -> Result<(), SinkError> {
        let batch = std::mem::take(
            &mut *self
                .pending
                .lock()
                .map_err(|_| SinkError::Write("event buffer poisoned".to_string()))?,
        );
        if batch.is_empty() {
            return Ok(());
        }
        self.device
            .lock()
            .map_err(|_| SinkError::Write("device handle poisoned".to_string()))?
            .emit(&batch)
            .map_err(|e| SinkError::Write(e.to_string()))
    }
}
