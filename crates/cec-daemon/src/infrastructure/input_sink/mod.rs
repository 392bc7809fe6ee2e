//! Virtual input device implementations.
//!
//! The kernel backend only exists on Linux; the recording mock is available
//! everywhere so the key state machine can be tested on any host.

pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;
