//! Filesystem usage via `statvfs(3)`.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use hostwatch_types::DiskUsage;

use super::round1;
use crate::error::ReadError;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// The subset of `struct statvfs` needed for usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStats {
    /// Size of the filesystem in fragment-size units.
    pub blocks: u64,
    /// Free blocks available to unprivileged users.
    pub available: u64,
    /// Fragment size in bytes.
    pub fragment_size: u64,
}

/// Query filesystem statistics for the filesystem containing `path`.
pub fn statvfs(path: &Path) -> Result<FsStats, ReadError> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| ReadError::Parse(format!("path {} contains NUL", path.display())))?;

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if ret != 0 {
        return Err(ReadError::unreadable(path, std::io::Error::last_os_error()));
    }

    Ok(FsStats {
        blocks: stat.f_blocks as u64,
        available: stat.f_bavail as u64,
        fragment_size: stat.f_frsize as u64,
    })
}

/// Convert raw statistics to usage. Used space is everything not available
/// to unprivileged users, so reserved blocks count as used.
pub fn disk_usage(stats: &FsStats) -> Result<DiskUsage, ReadError> {
    let total = stats.blocks as u128 * stats.fragment_size as u128;
    if total == 0 {
        return Err(ReadError::Degenerate("filesystem reports zero size"));
    }
    let free = stats.available as u128 * stats.fragment_size as u128;
    let used = total.saturating_sub(free);

    Ok(DiskUsage {
        used_gib: round1(used as f64 / GIB),
        total_gib: round1(total as f64 / GIB),
        percent: round1(100.0 * used as f64 / total as f64),
    })
}
