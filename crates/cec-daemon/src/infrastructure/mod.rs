//! Infrastructure layer: everything that touches the driver, the kernel, the
//! shell, process signals, or the file system.

pub mod cec_adapter;
pub mod hooks;
pub mod input_sink;
pub mod signals;
pub mod storage;
