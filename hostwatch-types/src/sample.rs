//! Sample - one timestamped row of the sampling history.

/// A point-in-time record of host utilisation.
///
/// Samples are produced once per sampling tick. Any metric whose reader
/// failed during that tick is `None`; the sample itself is still recorded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Seconds since the Unix epoch when the sample was taken.
    pub timestamp: i64,

    /// CPU utilisation in percent.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub cpu_percent: Option<f64>,

    /// Memory in use in percent of total.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub mem_percent: Option<f64>,

    /// Root filesystem usage in percent.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub disk_percent: Option<f64>,

    /// One-minute load average.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub load1: Option<f64>,
}

impl Sample {
    /// Create a builder for constructing samples.
    pub fn builder() -> SampleBuilder {
        SampleBuilder::new()
    }

    /// True when every metric is absent.
    pub fn is_empty(&self) -> bool {
        self.cpu_percent.is_none()
            && self.mem_percent.is_none()
            && self.disk_percent.is_none()
            && self.load1.is_none()
    }
}

/// Builder for `Sample`.
#[derive(Debug, Default)]
pub struct SampleBuilder {
    sample: Sample,
}

impl SampleBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timestamp (seconds since Unix epoch).
    pub fn timestamp(mut self, ts: i64) -> Self {
        self.sample.timestamp = ts;
        self
    }

    pub fn cpu_percent(mut self, value: f64) -> Self {
        self.sample.cpu_percent = Some(value);
        self
    }

    pub fn mem_percent(mut self, value: f64) -> Self {
        self.sample.mem_percent = Some(value);
        self
    }

    pub fn disk_percent(mut self, value: f64) -> Self {
        self.sample.disk_percent = Some(value);
        self
    }

    pub fn load1(mut self, value: f64) -> Self {
        self.sample.load1 = Some(value);
        self
    }

    /// Build the sample.
    pub fn build(self) -> Sample {
        self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_builder() {
        let sample = Sample::builder()
            .timestamp(1703160000)
            .cpu_percent(12.5)
            .load1(0.75)
            .build();

        assert_eq!(sample.timestamp, 1703160000);
        assert_eq!(sample.cpu_percent, Some(12.5));
        assert_eq!(sample.mem_percent, None);
        assert_eq!(sample.disk_percent, None);
        assert_eq!(sample.load1, Some(0.75));
        assert!(!sample.is_empty());
    }

    #[test]
    fn default_sample_has_no_metrics() {
        let sample = Sample::builder().timestamp(90).build();
        assert_eq!(sample.timestamp, 90);
        assert!(sample.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn absent_metrics_are_omitted_from_json() {
        let sample = Sample::builder().timestamp(60).mem_percent(62.5).build();
        let json = serde_json::to_string(&sample).unwrap();

        assert_eq!(json, r#"{"timestamp":60,"mem_percent":62.5}"#);
    }
}
