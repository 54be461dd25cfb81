//! Procfs-backed metric source.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use hostwatch_types::{DiskUsage, LoadAverage, MemoryUsage};
use tracing::debug;

use super::{cpu, disk, load, memory, uptime, MetricSource};
use crate::error::ReadError;

/// Gap between the two `/proc/stat` snapshots of a delta CPU reading.
pub const CPU_DELTA_WINDOW: Duration = Duration::from_secs(1);

/// A metric source reading the kernel's counter files.
///
/// [`Procfs::new`] reads the live system (`/proc`, root mount `/`). Other
/// roots exist so tests can point the readers at a prepared directory tree.
#[derive(Debug, Clone)]
pub struct Procfs {
    root: PathBuf,
    mount: PathBuf,
}

impl Procfs {
    /// Source for the running system.
    pub fn new() -> Self {
        Self::with_root("/proc", "/")
    }

    /// Source reading counter files below `root` and filesystem statistics
    /// for `mount`.
    pub fn with_root(root: impl Into<PathBuf>, mount: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mount: mount.into(),
        }
    }

    /// Hostname from `sys/kernel/hostname`, trimmed.
    pub fn hostname(&self) -> Option<String> {
        let result = self.read("sys/kernel/hostname").and_then(|content| {
            let name = content.trim();
            if name.is_empty() {
                Err(ReadError::Parse("hostname is empty".to_string()))
            } else {
                Ok(name.to_string())
            }
        });
        collapse("hostname", result)
    }

    fn read(&self, relative: &str) -> Result<String, ReadError> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).map_err(|e| ReadError::unreadable(path, e))
    }

    fn cpu_times(&self) -> Result<cpu::CpuTimes, ReadError> {
        cpu::parse_stat(&self.read("stat")?)
    }
}

impl Default for Procfs {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for Procfs {
    fn cpu_delta(&self) -> Option<f64> {
        let result = self.cpu_times().and_then(|before| {
            std::thread::sleep(CPU_DELTA_WINDOW);
            let after = self.cpu_times()?;
            cpu::delta_percent(&before, &after)
        });
        collapse("cpu_delta", result)
    }

    fn cpu_instant(&self) -> Option<f64> {
        let result = self.cpu_times().map(|times| cpu::instant_percent(&times));
        collapse("cpu_instant", result)
    }

    fn memory(&self) -> Option<MemoryUsage> {
        let result = self
            .read("meminfo")
            .and_then(|content| memory::parse_meminfo(&content));
        collapse("memory", result)
    }

    fn disk(&self) -> Option<DiskUsage> {
        let result = disk::statvfs(&self.mount).and_then(|stats| disk::disk_usage(&stats));
        collapse("disk", result)
    }

    fn load(&self) -> Option<LoadAverage> {
        let result = self
            .read("loadavg")
            .and_then(|content| load::parse_loadavg(&content));
        collapse("load", result)
    }

    fn uptime(&self) -> Option<String> {
        let result = self
            .read("uptime")
            .and_then(|content| uptime::parse_uptime(&content))
            .map(uptime::format_uptime);
        collapse("uptime", result)
    }
}

/// Drop a reader error to `None`, keeping a trace of why.
fn collapse<T>(metric: &'static str, result: Result<T, ReadError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(metric, error = %e, "metric unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostwatch_types::Overview;
    use tempfile::TempDir;

    fn fake_proc() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("stat"), "cpu  75 0 25 900 0 0 0 0 0 0\n").unwrap();
        fs::write(
            root.join("meminfo"),
            "MemTotal:        8000000 kB\nMemAvailable:    3000000 kB\n",
        )
        .unwrap();
        fs::write(root.join("loadavg"), "1.25 0.80 0.40 2/300 4242\n").unwrap();
        fs::write(root.join("uptime"), "93784.12 180000.00\n").unwrap();
        fs::create_dir_all(root.join("sys/kernel")).unwrap();
        fs::write(root.join("sys/kernel/hostname"), "x260\n").unwrap();
        dir
    }

    #[test]
    fn reads_every_metric_from_fake_tree() {
        let dir = fake_proc();
        let source = Procfs::with_root(dir.path(), "/");

        assert_eq!(source.cpu_instant(), Some(10.0));
        assert_eq!(source.memory().map(|m| m.percent), Some(62.5));
        assert_eq!(source.load().map(|l| l.one), Some(1.25));
        assert_eq!(source.uptime().as_deref(), Some("1d 2h"));
        assert_eq!(source.hostname().as_deref(), Some("x260"));
        assert!(source.disk().is_some());
    }

    #[test]
    fn missing_sources_collapse_to_none() {
        let dir = TempDir::new().unwrap();
        let source = Procfs::with_root(dir.path(), dir.path().join("gone"));

        assert_eq!(source.cpu_instant(), None);
        assert_eq!(source.memory(), None);
        assert_eq!(source.load(), None);
        assert_eq!(source.uptime(), None);
        assert_eq!(source.hostname(), None);
        assert_eq!(source.disk(), None);

        let overview = source.overview();
        assert_eq!(overview, Overview::default());
    }

    #[test]
    fn malformed_sources_collapse_to_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stat"), "intr 1 2 3\n").unwrap();
        fs::write(dir.path().join("loadavg"), "0.1\n").unwrap();
        fs::write(dir.path().join("meminfo"), "MemTotal: 0 kB\n").unwrap();
        let source = Procfs::with_root(dir.path(), "/");

        assert_eq!(source.cpu_instant(), None);
        assert_eq!(source.load(), None);
        assert_eq!(source.memory(), None);
    }

    #[test]
    fn cpu_delta_of_unchanging_counters_is_none() {
        // The fake stat file never advances, so the total delta is zero.
        let dir = fake_proc();
        let source = Procfs::with_root(dir.path(), "/");

        assert_eq!(source.cpu_delta(), None);
    }

    #[test]
    fn cpu_delta_without_source_returns_immediately() {
        let dir = TempDir::new().unwrap();
        let source = Procfs::with_root(dir.path(), "/");

        let started = std::time::Instant::now();
        assert_eq!(source.cpu_delta(), None);
        assert!(started.elapsed() < CPU_DELTA_WINDOW);
    }

    #[test]
    fn overview_uses_instant_cpu() {
        let dir = fake_proc();
        let source = Procfs::with_root(dir.path(), "/");

        let overview = source.overview();
        assert_eq!(overview.cpu_percent, Some(10.0));
        assert_eq!(overview.uptime.as_deref(), Some("1d 2h"));
    }
}
