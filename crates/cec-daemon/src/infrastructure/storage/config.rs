//! TOML configuration file for the daemon.
//!
//! Default location: `$XDG_CONFIG_HOME/cec-daemon/config.toml`, falling back
//! to `~/.config/cec-daemon/config.toml`.  A missing file is not an error;
//! every field has a default, so the daemon runs without one.
//!
//! ```toml
//! [device]
//! name = "htpc"          # OSD name shown by the TV (max 14 bytes)
//! port = "tv.2"          # or "av.1", or a physical address "2.0.0.0"
//! usb = "/dev/ttyACM0"   # adapter path or comm port
//!
//! [behaviour]
//! start_active = false
//! watchdog_secs = 43
//!
//! [hooks]
//! on_standby = "systemctl suspend"
//! on_activate = "xset dpms force on"
//! on_deactivate = ""
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Values given on the command line override the file (see `main.rs`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use cec_core::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::supervisor::{HookCommands, SupervisorConfig};

/// CEC limits the OSD name to 14 bytes.
pub const MAX_DEVICE_NAME_LEN: usize = 14;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaemonConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub behaviour: BehaviourConfig,
    #[serde(default)]
    pub hooks: HooksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which adapter to open and how to announce ourselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceConfig {
    /// OSD name.  Defaults to the host name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// HDMI port to announce.  Absent means autodetect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Address>,
    /// Adapter path or comm port, as printed by `--list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usb: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BehaviourConfig {
    /// Claim the active source right after opening the adapter.
    #[serde(default)]
    pub start_active: bool,
    /// Idle seconds between adapter pings.
    #[serde(default = "default_watchdog_secs")]
    pub watchdog_secs: u64,
}

/// Shell commands run on state changes.  Empty strings count as unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HooksConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_standby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_activate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_deactivate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing` level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_watchdog_secs() -> u64 {
    43
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            start_active: false,
            watchdog_secs: default_watchdog_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Builds the supervisor's view of this configuration.
    ///
    /// Fills in the host name when no device name is set and trims the name
    /// to [`MAX_DEVICE_NAME_LEN`] bytes.
    pub fn to_supervisor_config(&self) -> SupervisorConfig {
        let name = self.device.name.clone().unwrap_or_else(default_device_name);
        SupervisorConfig {
            device_name: truncate_device_name(&name).to_string(),
            target: self.device.port,
            start_active: self.behaviour.start_active,
            hooks: HookCommands {
                on_standby: non_empty(&self.hooks.on_standby),
                on_activate: non_empty(&self.hooks.on_activate),
                on_deactivate: non_empty(&self.hooks.on_deactivate),
            },
            watchdog: Duration::from_secs(self.behaviour.watchdog_secs.max(1)),
        }
    }
}

fn non_empty(command: &Option<String>) -> Option<String> {
    command
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// The host name, or `"cec-daemon"` if it cannot be read.
pub fn default_device_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "cec-daemon".to_string())
}

/// Cuts `name` to at most [`MAX_DEVICE_NAME_LEN`] bytes on a char boundary.
pub fn truncate_device_name(name: &str) -> &str {
    if name.len() <= MAX_DEVICE_NAME_LEN {
        return name;
    }
    let mut end = MAX_DEVICE_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(platform_config_dir()
        .ok_or(ConfigError::NoPlatformConfigDir)?
        .join("config.toml"))
}

/// Loads the config from `path`, or from [`config_file_path`] when `None`.
///
/// A missing file yields `DaemonConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<DaemonConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DaemonConfig::default()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &DaemonConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("cec-daemon"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
