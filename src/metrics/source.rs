use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use sysinfo::{Disks, System};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("system call failed: {0}")]
    Os(String),

    #[error("permission denied: {0}")]
    Permission(String),

    #[error("path not found: {0}")]
    PathNotFound(String),
}

/// The three host readings the reporter needs. Each accessor may fail on its
/// own; the sampler isolates failures per metric.
pub trait MetricSource {
    /// Instantaneous global CPU utilization in percent. Must not sleep to
    /// average over a window.
    fn cpu_percent(&mut self) -> Result<f64, ProbeError>;

    /// Virtual memory utilization in percent.
    fn memory_percent(&mut self) -> Result<f64, ProbeError>;

    /// Utilization of the filesystem containing `path`, in percent.
    fn disk_percent(&mut self, path: &Path) -> Result<f64, ProbeError>;
}

pub struct SysinfoSource {
    system: System,
    disks: Disks,
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            disks: Disks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for SysinfoSource {
    fn cpu_percent(&mut self) -> Result<f64, ProbeError> {
        // Usage is computed as a delta against the previous refresh, so this
        // returns immediately. The first reading after startup is 0.0.
        self.system.refresh_cpu_usage();
        let usage = self.system.global_cpu_usage();
        if !usage.is_finite() {
            return Err(ProbeError::Os("CPU usage unavailable".to_string()));
        }
        Ok(usage as f64)
    }

    fn memory_percent(&mut self) -> Result<f64, ProbeError> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(ProbeError::Os("total memory reported as zero".to_string()));
        }
        Ok(self.system.used_memory() as f64 / total as f64 * 100.0)
    }

    fn disk_percent(&mut self, path: &Path) -> Result<f64, ProbeError> {
        let resolved = fs::canonicalize(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProbeError::PathNotFound(path.display().to_string()),
            ErrorKind::PermissionDenied => ProbeError::Permission(path.display().to_string()),
            _ => ProbeError::Os(format!("{}: {}", path.display(), e)),
        })?;

        self.disks.refresh();

        // The filesystem containing the path is the one with the longest
        // matching mount point.
        let disk = self
            .disks
            .iter()
            .filter(|disk| resolved.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .ok_or_else(|| {
                ProbeError::Os(format!("no filesystem found containing {}", path.display()))
            })?;

        let total = disk.total_space();
        if total == 0 {
            return Err(ProbeError::Os(format!(
                "filesystem at {} reports zero size",
                disk.mount_point().display()
            )));
        }
        let used = total.saturating_sub(disk.available_space());
        Ok(used as f64 / total as f64 * 100.0)
    }
}
