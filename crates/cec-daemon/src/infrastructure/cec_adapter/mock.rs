//! Scripted in-memory CEC adapter for tests.
//!
//! # Why a scripted adapter?
//!
//! A real adapter needs a TV on the other end of an HDMI cable.  The
//! supervisor's interesting behaviour (restart on alert, deassert on exit,
//! watchdog ping) only shows up over several connection cycles, so tests need
//! an adapter whose behaviour per cycle is known in advance.
//!
//! `MockAdapter` is `Clone`; every clone shares one state behind an
//! `Arc<Mutex<..>>`.  Hand one clone to the supervisor and keep another to
//! script it and inspect what happened:
//!
//! ```ignore
//! let adapter = MockAdapter::new(vec![descriptor]);
//! adapter.attach_queue(Arc::clone(&queue));
//! adapter.script(vec![ScriptedEvent::Alert(AlertKind::ConnectionLost)]);
//! adapter.script(vec![ScriptedEvent::Push(Command::Exit)]);
//!
//! Supervisor::new(Box::new(adapter.clone()), queue, ...).run(None)?;
//!
//! assert_eq!(adapter.closes(), vec![false, true]);
//! ```
//!
//! Each call to [`MockAdapter::script`] describes one cycle.  The events are
//! delivered through the registered callbacks (or pushed directly onto the
//! attached queue for [`ScriptedEvent::Push`]) when `open` succeeds.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use cec_core::{Address, AlertKind, CecCommand, Command, Keypress, LogicalAddress};

use crate::application::command_queue::CommandQueue;
use crate::application::coordinator::CecCallbacks;
use crate::application::supervisor::{AdapterDescriptor, AdapterError, CecAdapterClient};

/// Something the scripted driver does right after opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedEvent {
    KeyPress(Keypress),
    Command(CecCommand),
    ConfigurationChanged(LogicalAddress),
    SourceActivated(LogicalAddress, bool),
    Alert(AlertKind),
    /// Bypasses the callbacks, like a signal handler would.
    Push(Command),
}

#[derive(Default)]
struct MockAdapterState {
    adapters: Vec<AdapterDescriptor>,
    scripts: VecDeque<Vec<ScriptedEvent>>,
    queue: Option<Arc<CommandQueue>>,
    callbacks: Option<Arc<dyn CecCallbacks>>,
    is_open: bool,
    fail_open: bool,
    fail_activation: bool,
    fail_ping: bool,
    opened_ports: Vec<String>,
    target_addresses: Vec<Address>,
    closes: Vec<bool>,
    pings: usize,
    activations: usize,
}

/// A recording, scriptable [`CecAdapterClient`].
#[derive(Clone, Default)]
pub struct MockAdapter {
    state: Arc<Mutex<MockAdapterState>>,
}

impl MockAdapter {
    pub fn new(adapters: Vec<AdapterDescriptor>) -> Self {
        let adapter = Self::default();
        adapter.lock().adapters = adapters;
        adapter
    }

    /// Queue that [`ScriptedEvent::Push`] writes to.
    pub fn attach_queue(&self, queue: Arc<CommandQueue>) {
        self.lock().queue = Some(queue);
    }

    /// Appends the events for the next not-yet-scripted cycle.
    pub fn script(&self, events: Vec<ScriptedEvent>) {
        self.lock().scripts.push_back(events);
    }

    pub fn fail_open(&self, fail: bool) {
        self.lock().fail_open = fail;
    }

    pub fn fail_activation(&self, fail: bool) {
        self.lock().fail_activation = fail;
    }

    pub fn fail_ping(&self, fail: bool) {
        self.lock().fail_ping = fail;
    }

    /// Callbacks registered by the most recent `open`, for driving the
    /// adapter from other threads.
    pub fn callbacks(&self) -> Option<Arc<dyn CecCallbacks>> {
        self.lock().callbacks.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open
    }

    pub fn open_count(&self) -> usize {
        self.lock().opened_ports.len()
    }

    pub fn opened_ports(&self) -> Vec<String> {
        self.lock().opened_ports.clone()
    }

    pub fn target_addresses(&self) -> Vec<Address> {
        self.lock().target_addresses.clone()
    }

    /// The `deassert_active` flag of every `close`, in order.
    pub fn closes(&self) -> Vec<bool> {
        self.lock().closes.clone()
    }

    pub fn pings(&self) -> usize {
        self.lock().pings
    }

    pub fn activations(&self) -> usize {
        self.lock().activations
    }

    fn lock(&self) -> MutexGuard<'_, MockAdapterState> {
        self.state.lock().unwrap()
    }
}

impl CecAdapterClient for MockAdapter {
    fn list_adapters(&self) -> Result<Vec<AdapterDescriptor>, AdapterError> {
        Ok(self.lock().adapters.clone())
    }

    fn set_target_address(&mut self, address: &Address) {
        self.lock().target_addresses.push(*address);
    }

    fn open(
        &mut self,
        comm_port: &str,
        callbacks: Arc<dyn CecCallbacks>,
    ) -> Result<(), AdapterError> {
        let (events, queue) = {
            let mut state = self.lock();
            state.opened_ports.push(comm_port.to_string());
            if state.fail_open {
                return Err(AdapterError::Driver("scripted open failure".to_string()));
            }
            state.is_open = true;
            state.callbacks = Some(Arc::clone(&callbacks));
            (state.scripts.pop_front().unwrap_or_default(), state.queue.clone())
        };

        // Delivered without the lock held; callbacks may call back into us.
        for event in events {
            match event {
                ScriptedEvent::KeyPress(keypress) => callbacks.on_key_press(keypress),
                ScriptedEvent::Command(command) => callbacks.on_command(command),
                ScriptedEvent::ConfigurationChanged(primary) => {
                    callbacks.on_configuration_changed(primary)
                }
                ScriptedEvent::SourceActivated(address, activated) => {
                    callbacks.on_source_activated(address, activated)
                }
                ScriptedEvent::Alert(kind) => callbacks.on_alert(kind, 0),
                ScriptedEvent::Push(command) => {
                    if let Some(queue) = &queue {
                        queue.push(command);
                    }
                }
            }
        }
        Ok(())
    }

    fn close(&mut self, deassert_active: bool) {
        let mut state = self.lock();
        state.is_open = false;
        state.callbacks = None;
        state.closes.push(deassert_active);
    }

    fn ping(&mut self) -> bool {
        let mut state = self.lock();
        state.pings += 1;
        state.is_open && !state.fail_ping
    }

    fn make_active_source(&mut self) -> Result<(), AdapterError> {
        let mut state = self.lock();
        if !state.is_open {
            return Err(AdapterError::NotOpen);
        }
        if state.fail_activation {
            return Err(AdapterError::Driver("scripted activation failure".to_string()));
        }
        state.activations += 1;
        Ok(())
    }
}
