//! Application layer of the daemon.
//!
//! # What lives here?
//!
//! - **`command_queue`** – The FIFO every producer (driver callback threads,
//!   signal handlers) pushes into and the single consumer thread drains.
//!
//! - **`key_repeat`** – The press/hold/repeat/release state machine, and the
//!   [`key_repeat::InputSink`] trait the virtual keyboard implements.
//!
//! - **`coordinator`** – Classifies raw driver events on the consumer thread
//!   (command filter, alerts, source activation) and owns the key state
//!   machine.  Also provides the queue-backed callback handler the adapter
//!   calls into.
//!
//! - **`supervisor`** – The open / run / restart lifecycle and the watchdog,
//!   and the [`supervisor::CecAdapterClient`] trait adapter backends implement.

pub mod command_queue;
pub mod coordinator;
pub mod key_repeat;
pub mod supervisor;
