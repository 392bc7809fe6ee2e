//! Finds CEC adapter device nodes.
//!
//! Two kinds of adapter show up on Linux:
//!
//! - `/dev/cecN`: the kernel CEC framework (GPU HDMI ports, Raspberry Pi).
//!   Sysfs entry under `/sys/class/cec/cecN`.
//! - `/dev/ttyACMN`: Pulse-Eight USB-CEC dongles, which enumerate as USB
//!   serial devices.  Sysfs entry under `/sys/class/tty/ttyACMN`.
//!
//! The descriptor's `path` is the resolved sysfs `device` link, which stays
//! the same across reboots even when the `/dev` numbering changes.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::application::supervisor::{AdapterDescriptor, AdapterError};

/// Device-node prefixes and the sysfs class each lives under.
const CLASSES: [(&str, &str); 2] = [("cec", "cec"), ("ttyACM", "tty")];

/// Scans `/dev` and `/sys/class`.
///
/// # Errors
///
/// Returns [`AdapterError::Driver`] if `/dev` cannot be read.
pub fn scan() -> Result<Vec<AdapterDescriptor>, AdapterError> {
    scan_in(Path::new("/dev"), Path::new("/sys/class"))
}

/// Scans `dev_dir` for adapter nodes and resolves each one's bus path under
/// `sys_class_dir`.  Results are sorted by comm port.
///
/// # Errors
///
/// Returns [`AdapterError::Driver`] if `dev_dir` cannot be read.
pub fn scan_in(dev_dir: &Path, sys_class_dir: &Path) -> Result<Vec<AdapterDescriptor>, AdapterError> {
    let entries = std::fs::read_dir(dev_dir)
        .map_err(|e| AdapterError::Driver(format!("read {}: {e}", dev_dir.display())))?;

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some((_, class)) = CLASSES
            .iter()
            .find(|(prefix, _)| is_numbered_node(&name, prefix))
        else {
            continue;
        };

        let comm_port = dev_dir.join(&name);
        let path = bus_path(sys_class_dir, class, &name).unwrap_or_else(|| comm_port.clone());
        trace!(node = %comm_port.display(), bus = %path.display(), "found adapter node");
        found.push(AdapterDescriptor {
            path: path.to_string_lossy().into_owned(),
            comm_port: comm_port.to_string_lossy().into_owned(),
        });
    }
    found.sort_by(|a, b| a.comm_port.cmp(&b.comm_port));
    Ok(found)
}

/// `prefix` followed by one or more digits and nothing else.
fn is_numbered_node(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn bus_path(sys_class_dir: &Path, class: &str, node: &str) -> Option<PathBuf> {
    std::fs::canonicalize(sys_class_dir.join(class).join(node).join("device")).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("cec-discovery-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("dev")).unwrap();
        fs::create_dir_all(root.join("sys")).unwrap();
        root
    }

    #[test]
    fn test_numbered_node_matching() {
        assert!(is_numbered_node("cec0", "cec"));
        assert!(is_numbered_node("ttyACM12", "ttyACM"));
        assert!(!is_numbered_node("cec", "cec"));
        assert!(!is_numbered_node("cec0p", "cec"));
        assert!(!is_numbered_node("ttyS0", "ttyACM"));
    }

    #[test]
    fn test_scan_finds_only_adapter_nodes_sorted() {
        // Arrange
        let root = fixture("nodes");
        for node in ["ttyACM1", "cec0", "ttyS0", "null", "ttyACM0"] {
            fs::write(root.join("dev").join(node), b"").unwrap();
        }

        // Act
        let found = scan_in(&root.join("dev"), &root.join("sys")).unwrap();

        // Assert
        let ports: Vec<_> = found
            .iter()
            .map(|a| Path::new(&a.comm_port).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(ports, vec!["cec0", "ttyACM0", "ttyACM1"]);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn test_bus_path_resolves_sysfs_device_link() {
        // Arrange
        let root = fixture("sysfs");
        fs::write(root.join("dev").join("ttyACM0"), b"").unwrap();
        let usb = root.join("sys").join("devices").join("usb1").join("1-1");
        fs::create_dir_all(&usb).unwrap();
        let class_entry = root.join("sys").join("tty").join("ttyACM0");
        fs::create_dir_all(&class_entry).unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(&usb, class_entry.join("device")).unwrap();

        // Act
        let found = scan_in(&root.join("dev"), &root.join("sys")).unwrap();

        // Assert
        assert_eq!(found.len(), 1);
        #[cfg(unix)]
        assert_eq!(
            Path::new(&found[0].path),
            fs::canonicalize(&usb).unwrap().as_path()
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn test_missing_dev_dir_is_an_error() {
        let result = scan_in(Path::new("/nonexistent/cec-daemon"), Path::new("/nonexistent"));
        assert!(matches!(result, Err(AdapterError::Driver(_))));
    }
}
