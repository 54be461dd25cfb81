//! HistorySeries - samples laid out as parallel arrays for charting.

use crate::Sample;

/// A window of history as parallel arrays, oldest first.
///
/// Index `i` of every array describes the same sample. Absent metrics are
/// kept as `None` so the arrays stay aligned; in JSON they become `null`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistorySeries {
    /// Sample timestamps, seconds since the Unix epoch.
    pub labels: Vec<i64>,
    /// CPU utilisation in percent.
    pub cpu: Vec<Option<f64>>,
    /// Memory usage in percent.
    pub mem: Vec<Option<f64>>,
    /// Root filesystem usage in percent.
    pub disk: Vec<Option<f64>>,
    /// One-minute load average.
    pub load: Vec<Option<f64>>,
}

impl HistorySeries {
    /// Create an empty series with room for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            cpu: Vec::with_capacity(capacity),
            mem: Vec::with_capacity(capacity),
            disk: Vec::with_capacity(capacity),
            load: Vec::with_capacity(capacity),
        }
    }

    /// Append one sample to the end of every array.
    pub fn push(&mut self, sample: &Sample) {
        self.labels.push(sample.timestamp);
        self.cpu.push(sample.cpu_percent);
        self.mem.push(sample.mem_percent);
        self.disk.push(sample.disk_percent);
        self.load.push(sample.load1);
    }

    /// Number of samples in the series.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<'a> FromIterator<&'a Sample> for HistorySeries {
    fn from_iter<I: IntoIterator<Item = &'a Sample>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut series = Self::with_capacity(iter.size_hint().0);
        for sample in iter {
            series.push(sample);
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_empty_arrays() {
        let series: HistorySeries = std::iter::empty::<&Sample>().collect();
        assert!(series.is_empty());
        assert!(series.cpu.is_empty());
        assert!(series.mem.is_empty());
        assert!(series.disk.is_empty());
        assert!(series.load.is_empty());
    }

    #[test]
    fn arrays_stay_aligned_with_gaps() {
        let samples = [
            Sample::builder().timestamp(30).cpu_percent(20.0).load1(0.5).build(),
            Sample::builder().timestamp(60).disk_percent(71.2).build(),
        ];
        let series: HistorySeries = samples.iter().collect();

        assert_eq!(series.len(), 2);
        assert_eq!(series.labels, vec![30, 60]);
        assert_eq!(series.cpu, vec![Some(20.0), None]);
        assert_eq!(series.disk, vec![None, Some(71.2)]);
        assert_eq!(series.load, vec![Some(0.5), None]);
        assert_eq!(series.mem, vec![None, None]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn absent_values_serialize_as_null() {
        let samples = [Sample::builder().timestamp(90).cpu_percent(40.0).build()];
        let series: HistorySeries = samples.iter().collect();
        let json = serde_json::to_string(&series).unwrap();

        assert_eq!(
            json,
            r#"{"labels":[90],"cpu":[40.0],"mem":[null],"disk":[null],"load":[null]}"#
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn empty_series_serializes_to_empty_arrays() {
        let json = serde_json::to_string(&HistorySeries::default()).unwrap();
        assert_eq!(json, r#"{"labels":[],"cpu":[],"mem":[],"disk":[],"load":[]}"#);
    }
}
