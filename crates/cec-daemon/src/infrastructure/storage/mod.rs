//! Storage infrastructure: the TOML configuration file.
//!
//! The daemon never writes state back on its own; the file is only written
//! when the user asks for it with `--write-config`.

pub mod config;
