//! cec-daemon: entry point.
//!
//! Loads configuration, sets up logging, creates the virtual keyboard and the
//! CEC adapter, installs signal handlers, and hands control to the
//! [`Supervisor`] until it exits.
//!
//! # Usage
//!
//! ```text
//! cec-daemon [OPTIONS] [USB]
//!
//! Arguments:
//!   [USB]  Adapter path or comm port to use (as shown by --list)
//!
//! Options:
//!   -l, --list                   List available CEC adapters and exit
//!   -v, --verbose...             More output (-vv for trace)
//!   -q, --quiet                  Only print errors
//!   -p, --port <ADDRESS>         HDMI port: "tv.2", "av.1" or "1.0.0.0"
//!   -n, --name <NAME>            OSD name shown by the TV
//!       --start-active           Claim the active source on startup
//!       --on-standby <CMD>       Run CMD when the TV goes to standby
//!       --on-activate <CMD>      Run CMD when we become the active source
//!       --on-deactivate <CMD>    Run CMD when we stop being the active source
//!       --watchdog-secs <SECS>   Idle seconds between adapter pings
//!   -c, --config <FILE>          Config file to use instead of the default
//!       --write-config           Write the effective configuration and exit
//! ```
//!
//! # Precedence
//!
//! Command line > environment (`CEC_DAEMON_*`) > config file > built-in
//! defaults.  For logging, `RUST_LOG` beats everything.
//!
//! # Signals
//!
//! `SIGHUP` reopens the adapter; `SIGINT` and `SIGTERM` stop the daemon.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cec_core::{Address, KeyMap};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cec_daemon::application::command_queue::CommandQueue;
use cec_daemon::application::key_repeat::InputSink;
use cec_daemon::application::supervisor::{CecAdapterClient, Supervisor};
use cec_daemon::infrastructure::cec_adapter::discovery;
use cec_daemon::infrastructure::hooks::ShellHookRunner;
use cec_daemon::infrastructure::storage::config::{
    config_file_path, load_config, save_config, DaemonConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Use your TV remote to control this computer over HDMI-CEC.
#[derive(Debug, Parser)]
#[command(name = "cec-daemon", version, about)]
struct Cli {
    /// Adapter path or comm port to use, as printed by `--list`.
    #[arg(env = "CEC_DAEMON_USB")]
    usb: Option<String>,

    /// List available CEC adapters and exit.
    #[arg(short, long)]
    list: bool,

    /// More output.  Repeat for even more (-vv).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print errors.
    #[arg(short, long)]
    quiet: bool,

    /// HDMI port to announce: `tv`, `tv.N`, `av.N`, or a physical `a.b.c.d`.
    #[arg(short, long, value_name = "ADDRESS", env = "CEC_DAEMON_PORT")]
    port: Option<Address>,

    /// OSD name shown by the TV (truncated to 14 bytes).  Defaults to the host name.
    #[arg(short, long, env = "CEC_DAEMON_NAME")]
    name: Option<String>,

    /// Claim the active source as soon as the adapter is open.
    #[arg(long)]
    start_active: bool,

    /// Shell command to run when the TV goes to standby.
    ///
    /// Without it, a TV standby is sent to the computer as a POWER key press.
    #[arg(long, value_name = "CMD", env = "CEC_DAEMON_ON_STANDBY")]
    on_standby: Option<String>,

    /// Shell command to run when this computer becomes the active source.
    #[arg(long, value_name = "CMD", env = "CEC_DAEMON_ON_ACTIVATE")]
    on_activate: Option<String>,

    /// Shell command to run when another source becomes active.
    #[arg(long, value_name = "CMD", env = "CEC_DAEMON_ON_DEACTIVATE")]
    on_deactivate: Option<String>,

    /// Seconds without traffic before the adapter is pinged.
    #[arg(long, value_name = "SECS", env = "CEC_DAEMON_WATCHDOG_SECS")]
    watchdog_secs: Option<u64>,

    /// Config file to use instead of `$XDG_CONFIG_HOME/cec-daemon/config.toml`.
    #[arg(short, long, value_name = "FILE", env = "CEC_DAEMON_CONFIG")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    /// Overlays the values given on the command line onto `config`.
    fn apply_to(&self, config: &mut DaemonConfig) {
        if let Some(usb) = &self.usb {
            config.device.usb = Some(usb.clone());
        }
        if let Some(port) = self.port {
            config.device.port = Some(port);
        }
        if let Some(name) = &self.name {
            config.device.name = Some(name.clone());
        }
        if self.start_active {
            config.behaviour.start_active = true;
        }
        if let Some(cmd) = &self.on_standby {
            config.hooks.on_standby = Some(cmd.clone());
        }
        if let Some(cmd) = &self.on_activate {
            config.hooks.on_activate = Some(cmd.clone());
        }
        if let Some(cmd) = &self.on_deactivate {
            config.hooks.on_deactivate = Some(cmd.clone());
        }
        if let Some(secs) = self.watchdog_secs {
            config.behaviour.watchdog_secs = secs;
        }
    }

    /// Log filter directive used when `RUST_LOG` is not set.
    fn log_filter(&self, configured: &str) -> String {
        match (self.quiet, self.verbose) {
            (true, _) => "error".to_string(),
            (false, 0) => configured.to_string(),
            (false, 1) => "debug".to_string(),
            (false, _) => "trace".to_string(),
        }
    }
}

// ── Platform backends ─────────────────────────────────────────────────────────

#[cfg(feature = "libcec")]
fn create_adapter(device_name: &str) -> anyhow::Result<Box<dyn CecAdapterClient>> {
    Ok(Box::new(
        cec_daemon::infrastructure::cec_adapter::libcec::LibCecAdapter::new(device_name),
    ))
}

#[cfg(not(feature = "libcec"))]
fn create_adapter(_device_name: &str) -> anyhow::Result<Box<dyn CecAdapterClient>> {
    anyhow::bail!("cec-daemon was built without libcec support; rebuild with `--features libcec`")
}

#[cfg(target_os = "linux")]
fn create_sink(keymap: &KeyMap) -> anyhow::Result<Arc<dyn InputSink>> {
    let sink = cec_daemon::infrastructure::input_sink::linux::UinputSink::new(keymap)
        .context("failed to create virtual input device (is the uinput module loaded?)")?;
    Ok(Arc::new(sink))
}

#[cfg(not(target_os = "linux"))]
fn create_sink(_keymap: &KeyMap) -> anyhow::Result<Arc<dyn InputSink>> {
    anyhow::bail!("virtual input devices are only supported on Linux")
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let filter = cli.log_filter(&config.logging.level);
    cli.apply_to(&mut config);

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins when set; otherwise -q / -v / the config file decide.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => config_file_path()?,
        };
        save_config(&config, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    if cli.list {
        let adapters = discovery::scan().context("failed to scan for CEC adapters")?;
        if adapters.is_empty() {
            println!("no CEC adapters found");
        }
        for adapter in adapters {
            println!("{}\t{}", adapter.comm_port, adapter.path);
        }
        return Ok(());
    }

    let supervisor_config = config.to_supervisor_config();
    info!(
        "cec-daemon {} starting as '{}'",
        env!("CARGO_PKG_VERSION"),
        supervisor_config.device_name
    );

    let adapter = create_adapter(&supervisor_config.device_name)?;
    let keymap = Arc::new(KeyMap::standard());
    let sink = create_sink(&keymap)?;
    let queue = Arc::new(CommandQueue::new());

    #[cfg(unix)]
    let _signals = cec_daemon::infrastructure::signals::spawn_signal_listeners(Arc::clone(&queue))
        .context("failed to install signal handlers")?;

    let mut supervisor = Supervisor::new(
        adapter,
        queue,
        keymap,
        sink,
        Arc::new(ShellHookRunner),
        supervisor_config,
    );

    // The supervisor loop blocks on the command queue; keep it off the
    // runtime's async worker so the signal tasks keep running.
    let hint = config.device.usb.clone();
    tokio::task::block_in_place(|| supervisor.run(hint.as_deref()))
        .context("CEC connection failed")?;

    info!("cec-daemon stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cec_core::LogicalDeviceKind;

    #[test]
    fn test_cli_defaults() {
        // Arrange / Act
        let cli = Cli::parse_from(["cec-daemon"]);

        // Assert
        assert!(!cli.list);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.port.is_none());
        assert!(!cli.start_active);
    }

    #[test]
    fn test_cli_positional_usb() {
        let cli = Cli::parse_from(["cec-daemon", "/dev/ttyACM0"]);
        assert_eq!(cli.usb.as_deref(), Some("/dev/ttyACM0"));
    }

    #[test]
    fn test_cli_port_is_parsed_as_address() {
        let cli = Cli::parse_from(["cec-daemon", "--port", "av.3"]);
        assert_eq!(
            cli.port,
            Some(Address::logical(LogicalDeviceKind::AudioSystem, 3).unwrap())
        );
    }

    #[test]
    fn test_cli_rejects_invalid_port() {
        let result = Cli::try_parse_from(["cec-daemon", "--port", "tv.16"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["cec-daemon", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(Cli::parse_from(["cec-daemon"]).log_filter("warn"), "warn");
        assert_eq!(Cli::parse_from(["cec-daemon", "-v"]).log_filter("warn"), "debug");
        assert_eq!(Cli::parse_from(["cec-daemon", "-vv"]).log_filter("warn"), "trace");
        assert_eq!(Cli::parse_from(["cec-daemon", "-q"]).log_filter("warn"), "error");
    }

    #[test]
    fn test_cli_overrides_config_file_values() {
        // Arrange
        let mut config = DaemonConfig::default();
        config.device.name = Some("from-file".to_string());
        config.hooks.on_activate = Some("file-hook".to_string());
        let cli = Cli::parse_from([
            "cec-daemon",
            "--name",
            "from-cli",
            "--start-active",
            "--watchdog-secs",
            "7",
            "/dev/cec0",
        ]);

        // Act
        cli.apply_to(&mut config);

        // Assert
        assert_eq!(config.device.name.as_deref(), Some("from-cli"));
        assert_eq!(config.device.usb.as_deref(), Some("/dev/cec0"));
        assert!(config.behaviour.start_active);
        assert_eq!(config.behaviour.watchdog_secs, 7);
        assert_eq!(config.hooks.on_activate.as_deref(), Some("file-hook"));
    }
}
