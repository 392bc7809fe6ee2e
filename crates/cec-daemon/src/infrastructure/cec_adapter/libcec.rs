//! CEC adapter backend on top of libcec (`cec-rs` bindings).
//!
//! # How libcec delivers events (for beginners)
//!
//! libcec runs its own reader thread per connection.  Whenever the TV sends
//! something it calls the closures registered in `CecConnectionCfg`: one for
//! key presses, one for raw protocol commands, one for its own log lines.
//! Those closures run on libcec's thread, so they only forward to the
//! [`CecCallbacks`] handle, which enqueues and returns.
//!
//! # Callbacks libcec does not expose through `cec-rs`
//!
//! The bindings do not surface configuration-changed, alert, menu-state or
//! source-activated callbacks.  This backend covers what the daemon needs:
//!
//! - configuration-changed: reported once after `open` from
//!   `get_logical_addresses`;
//! - source-activated (deactivation only): `ACTIVE_SOURCE` broadcasts are
//!   forwarded as ordinary commands and the coordinator treats one from any
//!   other device as losing the active source;
//! - alerts: a dead connection is caught by the watchdog ping instead.

use std::ffi::CString;
use std::sync::Arc;

use cec_core::{
    Address, CecCommand, Keypress, LogLevel, LogicalAddress, LogicalDeviceKind, Opcode,
    UserControlCode,
};
use cec_rs::{
    CecConnection, CecConnectionCfgBuilder, CecDeviceType, CecDeviceTypeVec, CecLogLevel,
    CecLogicalAddress,
};
use tracing::{debug, warn};

use super::discovery;
use crate::application::coordinator::CecCallbacks;
use crate::application::supervisor::{AdapterDescriptor, AdapterError, CecAdapterClient};

/// [`CecAdapterClient`] backed by a libcec connection.
pub struct LibCecAdapter {
    device_name: String,
    target: Option<Address>,
    connection: Option<CecConnection>,
}

impl LibCecAdapter {
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            target: None,
            connection: None,
        }
    }

    fn connection(&self) -> Result<&CecConnection, AdapterError> {
        self.connection.as_ref().ok_or(AdapterError::NotOpen)
    }
}

impl CecAdapterClient for LibCecAdapter {
    fn list_adapters(&self) -> Result<Vec<AdapterDescriptor>, AdapterError> {
        discovery::scan()
    }

    fn set_target_address(&mut self, address: &Address) {
        self.target = Some(*address);
    }

    fn open(
        &mut self,
        comm_port: &str,
        callbacks: Arc<dyn CecCallbacks>,
    ) -> Result<(), AdapterError> {
        let port = CString::new(comm_port)
            .map_err(|_| AdapterError::Driver(format!("invalid port name '{comm_port}'")))?;

        let key_cb = Arc::clone(&callbacks);
        let cmd_cb = Arc::clone(&callbacks);
        let log_cb = Arc::clone(&callbacks);

        let mut builder = CecConnectionCfgBuilder::default()
            .port(port)
            .device_name(self.device_name.clone())
            .device_types(CecDeviceTypeVec::new(CecDeviceType::PlaybackDevice))
            .activate_source(false)
            .key_press_callback(Box::new(move |key| {
                key_cb.on_key_press(Keypress {
                    keycode: UserControlCode(key.keycode as u8),
                    duration: key.duration,
                });
            }))
            .command_received_callback(Box::new(move |cmd| {
                cmd_cb.on_command(CecCommand {
                    initiator: logical_from(cmd.initiator),
                    destination: logical_from(cmd.destination),
                    opcode: Opcode(cmd.opcode as u8),
                    parameters: cmd.parameters.0.iter().copied().collect(),
                });
            }))
            .log_message_callback(Box::new(move |msg| {
                log_cb.on_log_message(log_level_from(msg.level), &msg.message);
            }));

        match self.target {
            Some(Address::Physical(physical)) => {
                builder = builder.physical_address(physical.raw());
            }
            Some(Address::Logical { device, port }) => {
                builder = builder.base_device(match device {
                    LogicalDeviceKind::Tv => CecLogicalAddress::Tv,
                    LogicalDeviceKind::AudioSystem => CecLogicalAddress::Audiosystem,
                });
                if port != 0 {
                    builder = builder.hdmi_port(port);
                }
            }
            None => {}
        }

        let connection = builder
            .build()
            .map_err(|e| AdapterError::Driver(format!("invalid libcec configuration: {e}")))?
            .open()
            .map_err(|e| AdapterError::Driver(format!("{e:?}")))?;

        match connection.get_logical_addresses() {
            Ok(addresses) => {
                callbacks.on_configuration_changed(logical_from(addresses.primary.into()));
            }
            Err(e) => warn!("could not read logical addresses: {e:?}"),
        }

        self.connection = Some(connection);
        Ok(())
    }

    fn close(&mut self, deassert_active: bool) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        if deassert_active {
            if let Err(e) = connection.set_inactive_view() {
                warn!("failed to mark view inactive: {e:?}");
            }
        }
        debug!("closing libcec connection");
        drop(connection);
    }

    fn ping(&mut self) -> bool {
        self.connection()
            .map(|c| c.get_logical_addresses().is_ok())
            .unwrap_or(false)
    }

    fn make_active_source(&mut self) -> Result<(), AdapterError> {
        self.connection()?
            .set_active_source(CecDeviceType::PlaybackDevice)
            .map_err(|e| AdapterError::Driver(format!("{e:?}")))
    }
}

fn logical_from(address: CecLogicalAddress) -> LogicalAddress {
    u8::try_from(address as i32)
        .ok()
        .and_then(LogicalAddress::new)
        .unwrap_or(LogicalAddress::BROADCAST)
}

fn log_level_from(level: CecLogLevel) -> LogLevel {
    match level {
        CecLogLevel::Error => LogLevel::Error,
        CecLogLevel::Warning => LogLevel::Warning,
        CecLogLevel::Notice => LogLevel::Notice,
        CecLogLevel::Traffic => LogLevel::Traffic,
        _ => LogLevel::Debug,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
