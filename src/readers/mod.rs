//! Metric readers over kernel counter sources.
//!
//! Each reader is split into a pure parser (in the submodules, operating on
//! the text of one counter file) and a thin I/O wrapper on [`Procfs`]. The
//! wrappers never fail: any [`ReadError`](crate::error::ReadError) collapses
//! to `None` for that one metric and is logged at debug level.
//!
//! ## Submodules
//!
//! - [`cpu`]: `/proc/stat` counters, instantaneous and delta utilisation
//! - [`memory`]: `/proc/meminfo` used/available
//! - [`disk`]: `statvfs(3)` on the root mount
//! - [`load`]: `/proc/loadavg`
//! - [`uptime`]: `/proc/uptime` and its display format

pub mod cpu;
pub mod disk;
pub mod load;
pub mod memory;
mod procfs;
pub mod uptime;

pub use procfs::{Procfs, CPU_DELTA_WINDOW};

use std::fmt::Debug;

use hostwatch_types::{DiskUsage, LoadAverage, MemoryUsage, Overview};

/// Trait for anything that can produce host metrics.
///
/// The sampler and the status page read through this trait. [`Procfs`] is
/// the implementation backed by the running kernel.
///
/// Every method returns `None` rather than failing, and may block: callers
/// must keep them off latency-sensitive paths (see [`cpu_delta`](Self::cpu_delta)).
pub trait MetricSource: Send + Sync + Debug {
    /// CPU utilisation measured over a short window.
    ///
    /// Blocks the calling thread for the length of the window.
    fn cpu_delta(&self) -> Option<f64>;

    /// CPU utilisation since boot from a single snapshot.
    fn cpu_instant(&self) -> Option<f64>;

    fn memory(&self) -> Option<MemoryUsage>;

    fn disk(&self) -> Option<DiskUsage>;

    fn load(&self) -> Option<LoadAverage>;

    /// Formatted uptime, e.g. "2h 5m".
    fn uptime(&self) -> Option<String>;

    /// Read everything the status page shows. Uses the instantaneous CPU form
    /// so it never blocks on a measurement window.
    fn overview(&self) -> Overview {
        Overview {
            cpu_percent: self.cpu_instant(),
            load: self.load(),
            memory: self.memory(),
            disk: self.disk(),
            uptime: self.uptime(),
        }
    }
}

/// Load averages of the running system.
pub fn read_load() -> Option<LoadAverage> {
    Procfs::new().load()
}

/// CPU utilisation since boot.
pub fn read_cpu_instant() -> Option<f64> {
    Procfs::new().cpu_instant()
}

/// CPU utilisation over the next second. Blocks for [`CPU_DELTA_WINDOW`].
pub fn read_cpu_delta() -> Option<f64> {
    Procfs::new().cpu_delta()
}

/// Memory usage of the running system.
pub fn read_mem() -> Option<MemoryUsage> {
    Procfs::new().memory()
}

/// Usage of the root filesystem.
pub fn read_disk() -> Option<DiskUsage> {
    Procfs::new().disk()
}

/// Formatted uptime of the running system.
pub fn read_uptime() -> Option<String> {
    Procfs::new().uptime()
}

/// Hostname of the running system.
pub fn read_hostname() -> Option<String> {
    Procfs::new().hostname()
}

/// Round to one decimal place.
///
/// Rounds the exact binary value, with exact ties going to the even digit:
/// 0.25 becomes 0.2 and 0.35 (stored just below) becomes 0.3. Scaling by
/// ten first would round both up.
pub(crate) fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
