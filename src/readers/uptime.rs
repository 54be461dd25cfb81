//! Uptime from `/proc/uptime`.

use crate::error::ReadError;

/// Parse the elapsed-seconds field of `/proc/uptime`, truncated to whole seconds.
pub fn parse_uptime(content: &str) -> Result<u64, ReadError> {
    let raw = content
        .split_whitespace()
        .next()
        .ok_or_else(|| ReadError::Parse("/proc/uptime: empty".to_string()))?;
    let seconds: f64 = raw
        .parse()
        .map_err(|_| ReadError::Parse(format!("/proc/uptime: bad value {:?}", raw)))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ReadError::Parse(format!("/proc/uptime: bad value {:?}", raw)));
    }
    Ok(seconds as u64)
}

/// Format elapsed seconds using the coarsest unit that applies.
///
/// `"Xd Yh"` from one day, `"Xh Ym"` from one hour, otherwise `"Xm"`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = seconds % 86_400 / 3_600;
    let minutes = seconds % 3_600 / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
