//! Bounded, time-ordered sample history.

use std::collections::VecDeque;
use std::time::Duration;

use hostwatch_types::{HistorySeries, Sample};
use parking_lot::RwLock;

/// Default number of samples kept: 24 hours at the default cadence.
pub const DEFAULT_CAPACITY: usize = 2880;

/// Default time between samples.
pub const DEFAULT_CADENCE: Duration = Duration::from_secs(30);

/// Query window used when a request does not name one: 6 hours.
pub const DEFAULT_PERIOD_SECS: i64 = 21_600;

/// Fixed-capacity history of samples, oldest first.
///
/// One instance is shared (behind an `Arc`) by the sampler, which is the only
/// writer, and by every request handler. All access goes through a single
/// lock, so a query never observes a half-finished append.
///
/// Invariants:
/// - `len() <= capacity()`; recording into a full history evicts the oldest sample.
/// - Timestamps never decrease from front to back.
#[derive(Debug)]
pub struct History {
    samples: RwLock<VecDeque<Sample>>,
    capacity: usize,
    cadence: Duration,
}

impl History {
    /// Create an empty history.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize, cadence: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            cadence,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Time between samples, used to turn query periods into sample counts.
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }

    /// Append a sample, evicting the oldest one if the history is full.
    ///
    /// If the sample is older than the newest recorded one (wall clock
    /// stepped backwards) its timestamp is raised to the newest timestamp so
    /// the history stays ordered. Returns the evicted sample, if any.
    pub fn record(&self, mut sample: Sample) -> Option<Sample> {
        let mut samples = self.samples.write();

        if let Some(newest) = samples.back() {
            if sample.timestamp < newest.timestamp {
                sample.timestamp = newest.timestamp;
            }
        }

        let evicted = if samples.len() >= self.capacity {
            samples.pop_front()
        } else {
            None
        };
        samples.push_back(sample);
        evicted
    }

    /// Number of samples a query over `period_secs` asks for.
    ///
    /// `period_secs / cadence`, clamped to `1..=capacity`. Zero and negative
    /// periods ask for one sample.
    pub fn window_len(&self, period_secs: i64) -> usize {
        let cadence_ms = self.cadence.as_millis().max(1) as i128;
        let wanted = period_secs as i128 * 1000 / cadence_ms;
        wanted.clamp(1, self.capacity as i128) as usize
    }

    /// The most recent samples covering `period_secs`, as parallel arrays in
    /// chronological order.
    pub fn query(&self, period_secs: i64) -> HistorySeries {
        let n = self.window_len(period_secs);
        let samples = self.samples.read();
        let skip = samples.len().saturating_sub(n);
        samples.iter().skip(skip).collect()
    }

    /// The newest sample, if any.
    pub fn latest(&self) -> Option<Sample> {
        self.samples.read().back().copied()
    }

    /// Copy of every sample, oldest first.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.read().iter().copied().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_CADENCE)
    }
}
