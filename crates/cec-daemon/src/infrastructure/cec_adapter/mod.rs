//! CEC adapter backends.
//!
//! The libcec backend needs libcec and its headers at build time, so it is
//! only compiled with the `libcec` cargo feature.  Discovery is a plain
//! filesystem scan and is always available.

pub mod discovery;
pub mod mock;

#[cfg(feature = "libcec")]
pub mod libcec;
