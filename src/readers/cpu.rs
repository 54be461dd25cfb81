//! CPU utilisation from the aggregate `cpu` line of `/proc/stat`.

use super::round1;
use crate::error::ReadError;

/// The seven time counters of the aggregate `cpu` line, in clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
}

impl CpuTimes {
    /// Sum of all seven counters. Widened so no counter values can overflow it.
    pub fn total(&self) -> u128 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
        ]
        .iter()
        .map(|&ticks| u128::from(ticks))
        .sum()
    }
}

/// Parse the aggregate `cpu` line out of `/proc/stat` content.
///
/// Per-core lines (`cpu0`, `cpu1`, ...) are ignored. Fields past the seventh
/// (steal, guest) are not counted.
pub fn parse_stat(content: &str) -> Result<CpuTimes, ReadError> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| ReadError::Parse("/proc/stat: no aggregate cpu line".to_string()))?;

    let mut fields = [0u64; 7];
    let mut values = line.split_whitespace().skip(1);
    for slot in fields.iter_mut() {
        let raw = values
            .next()
            .ok_or_else(|| ReadError::Parse(format!("/proc/stat: short cpu line {:?}", line)))?;
        *slot = raw
            .parse()
            .map_err(|_| ReadError::Parse(format!("/proc/stat: bad counter {:?}", raw)))?;
    }

    let [user, nice, system, idle, iowait, irq, softirq] = fields;
    Ok(CpuTimes {
        user,
        nice,
        system,
        idle,
        iowait,
        irq,
        softirq,
    })
}

/// Utilisation since boot from a single snapshot.
///
/// A zero total yields exactly `0.0`.
pub fn instant_percent(times: &CpuTimes) -> f64 {
    let total = times.total();
    if total == 0 {
        return 0.0;
    }
    let busy = total - u128::from(times.idle);
    round1(100.0 * busy as f64 / total as f64)
}

/// Utilisation between two snapshots.
///
/// Fails with [`ReadError::Degenerate`] when the total did not advance, which
/// happens on counter resets or when both snapshots are identical.
pub fn delta_percent(before: &CpuTimes, after: &CpuTimes) -> Result<f64, ReadError> {
    let d_idle = after.idle as i128 - before.idle as i128;
    let d_total = after.total() as i128 - before.total() as i128;
    if d_total <= 0 {
        return Err(ReadError::Degenerate("cpu total did not advance"));
    }
    Ok(round1(100.0 * (1.0 - d_idle as f64 / d_total as f64)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "\
cpu  4705 356 584 3699 23 0 23 0 0 0
cpu0 1393 280 286 1848 10 0 11 0 0 0
cpu1 3312 76 298 1851 13 0 12 0 0 0
intr 114930548 113199788 3 0 5 263 0 4 [...]
ctxt 1990473
btime 1062191376
";

    #[test]
    fn parses_aggregate_line() {
        let times = parse_stat(STAT).unwrap();
        assert_eq!(
            times,
            CpuTimes {
                user: 4705,
                nice: 356,
                system: 584,
                idle: 3699,
                iowait: 23,
                irq: 0,
                softirq: 23,
            }
        );
        assert_eq!(times.total(), 9390);
    }

    #[test]
    fn ignores_per_core_lines() {
        let content = "cpu0 1 2 3 4 5 6 7\ncpu 10 0 0 90 0 0 0\n";
        let times = parse_stat(content).unwrap();
        assert_eq!(times.user, 10);
        assert_eq!(times.idle, 90);
    }

    #[test]
    fn rejects_missing_and_short_lines() {
        assert!(matches!(parse_stat(""), Err(ReadError::Parse(_))));
        assert!(matches!(parse_stat("cpu0 1 2 3 4 5 6 7\n"), Err(ReadError::Parse(_))));
        assert!(matches!(parse_stat("cpu 1 2 3 4 5 6\n"), Err(ReadError::Parse(_))));
        assert!(matches!(parse_stat("cpu 1 2 x 4 5 6 7\n"), Err(ReadError::Parse(_))));
    }

    #[test]
    fn huge_counters_do_not_overflow() {
        let times = parse_stat("cpu 18446744073709551615 1 0 0 0 0 0\n").unwrap();
        assert_eq!(times.total(), u64::MAX as u128 + 1);
        assert_eq!(instant_percent(&times), 100.0);

        let idle = parse_stat("cpu 0 0 0 18446744073709551615 18446744073709551615 0 0\n").unwrap();
        assert_eq!(instant_percent(&idle), 50.0);

        let later = CpuTimes {
            idle: u64::MAX,
            user: 10,
            ..idle
        };
        assert_eq!(delta_percent(&idle, &later).unwrap(), 100.0);
    }

    #[test]
    fn instant_percent_from_counters() {
        let times = parse_stat(STAT).unwrap();
        // (9390 - 3699) / 9390 = 60.607...
        assert_eq!(instant_percent(&times), 60.6);
    }

    #[test]
    fn instant_percent_zero_total_is_zero() {
        assert_eq!(instant_percent(&CpuTimes::default()), 0.0);
    }

    #[test]
    fn instant_percent_stays_in_range() {
        let all_idle = CpuTimes {
            idle: 500,
            ..Default::default()
        };
        let all_busy = CpuTimes {
            user: 300,
            system: 200,
            ..Default::default()
        };
        assert_eq!(instant_percent(&all_idle), 0.0);
        assert_eq!(instant_percent(&all_busy), 100.0);
    }

    #[test]
    fn delta_percent_from_difference() {
        let before = CpuTimes {
            user: 100,
            idle: 900,
            ..Default::default()
        };
        let after = CpuTimes {
            user: 125,
            system: 5,
            idle: 970,
            ..Default::default()
        };
        // d_total = 100, d_idle = 70
        assert_eq!(delta_percent(&before, &after).unwrap(), 30.0);
    }

    #[test]
    fn delta_percent_idle_only_progress_is_zero() {
        let before = CpuTimes {
            user: 100,
            idle: 900,
            ..Default::default()
        };
        let after = CpuTimes {
            idle: 1000,
            ..before
        };
        assert_eq!(delta_percent(&before, &after).unwrap(), 0.0);
    }

    #[test]
    fn delta_percent_without_progress_is_degenerate() {
        let times = parse_stat(STAT).unwrap();
        assert!(matches!(
            delta_percent(&times, &times),
            Err(ReadError::Degenerate(_))
        ));

        let reset = CpuTimes {
            idle: 10,
            ..Default::default()
        };
        assert!(matches!(
            delta_percent(&times, &reset),
            Err(ReadError::Degenerate(_))
        ));
    }
}
