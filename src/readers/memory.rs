//! Memory usage from `/proc/meminfo`.

use hostwatch_types::MemoryUsage;

use super::round1;
use crate::error::ReadError;

/// Look up a `Key:   1234 kB` line and return the number.
///
/// A missing key reads as 0.
fn field_kib(content: &str, key: &str) -> Result<u64, ReadError> {
    let Some(raw) = content.lines().find_map(|line| {
        let (name, rest) = line.split_once(':')?;
        (name.trim() == key).then_some(rest)
    }) else {
        return Ok(0);
    };

    raw.split_whitespace()
        .next()
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| ReadError::Parse(format!("/proc/meminfo: bad {} value {:?}", key, raw.trim())))
}

/// Compute memory usage from `/proc/meminfo` content.
///
/// Used memory is `MemTotal - MemAvailable`.
pub fn parse_meminfo(content: &str) -> Result<MemoryUsage, ReadError> {
    let total = field_kib(content, "MemTotal")?;
    let available = field_kib(content, "MemAvailable")?;
    if total == 0 {
        return Err(ReadError::Degenerate("MemTotal is zero"));
    }
    let used = total.saturating_sub(available);

    Ok(MemoryUsage {
        used_mib: round1(used as f64 / 1024.0),
        total_mib: round1(total as f64 / 1024.0),
        percent: round1(100.0 * used as f64 / total as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_used_from_available() {
        let content = "\
MemTotal:        8000000 kB
MemFree:          500000 kB
MemAvailable:    3000000 kB
Buffers:          200000 kB
";
        let usage = parse_meminfo(content).unwrap();
        assert_eq!(usage.percent, 62.5);
        assert_eq!(usage.used_mib, 4882.8);
        assert_eq!(usage.total_mib, 7812.5);
    }

    #[test]
    fn missing_available_counts_as_zero() {
        let usage = parse_meminfo("MemTotal: 2048 kB\n").unwrap();
        assert_eq!(usage.percent, 100.0);
        assert_eq!(usage.used_mib, 2.0);
    }

    #[test]
    fn zero_or_missing_total_is_degenerate() {
        assert!(matches!(
            parse_meminfo("MemAvailable: 100 kB\n"),
            Err(ReadError::Degenerate(_))
        ));
        assert!(matches!(
            parse_meminfo("MemTotal: 0 kB\nMemAvailable: 0 kB\n"),
            Err(ReadError::Degenerate(_))
        ));
        assert!(matches!(parse_meminfo(""), Err(ReadError::Degenerate(_))));
    }

    #[test]
    fn garbage_value_is_parse_error() {
        assert!(matches!(
            parse_meminfo("MemTotal: lots kB\n"),
            Err(ReadError::Parse(_))
        ));
    }

    #[test]
    fn key_match_is_exact() {
        // "MemTotalX" must not be taken for "MemTotal"
        let content = "MemTotalX: 1 kB\nMemTotal: 1000 kB\nMemAvailable: 250 kB\n";
        assert_eq!(parse_meminfo(content).unwrap().percent, 75.0);
    }
}
