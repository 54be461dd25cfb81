//! Background sampling loop feeding a [`History`].

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use hostwatch_types::Sample;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::History;
use crate::readers::MetricSource;

/// Read every sampled metric from `source` and stamp the result with the
/// current wall-clock time.
///
/// CPU prefers the delta form and falls back to the instantaneous form.
/// Metrics whose reader fails are left absent; this never fails as a whole.
pub fn collect_sample(source: &dyn MetricSource) -> Sample {
    let cpu_percent = source.cpu_delta().or_else(|| source.cpu_instant());
    let mem_percent = source.memory().map(|m| m.percent);
    let disk_percent = source.disk().map(|d| d.percent);
    let load1 = source.load().map(|l| l.one);

    Sample {
        timestamp: unix_now(),
        cpu_percent,
        mem_percent,
        disk_percent,
        load1,
    }
}

/// Seconds since the Unix epoch.
fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Periodically samples a [`MetricSource`] into a shared [`History`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use hostwatch::{History, Procfs, Sampler};
///
/// # tokio_test::block_on(async {
/// let history = Arc::new(History::default());
/// let handle = Sampler::new(history.clone(), Arc::new(Procfs::new())).start();
///
/// // ... serve queries from `history` ...
///
/// handle.stop();
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    history: Arc<History>,
    source: Arc<dyn MetricSource>,
}

impl Sampler {
    pub fn new(history: Arc<History>, source: Arc<dyn MetricSource>) -> Self {
        Self { history, source }
    }

    /// Take one sample and record it. Blocks for as long as the source does.
    pub fn tick(&self) -> Sample {
        let sample = collect_sample(self.source.as_ref());
        self.history.record(sample);
        sample
    }

    /// Start the sampling loop on the tokio runtime.
    ///
    /// The first sample is taken one cadence period after the call. Each
    /// tick runs on the blocking pool, so the delta CPU window never stalls
    /// an async worker. A tick that panics is logged and the loop carries on
    /// at the next period.
    ///
    /// Returns a handle that stops the loop when stopped or dropped.
    pub fn start(self) -> SamplerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let cadence = self.history.cadence();

        info!(
            cadence_secs = cadence.as_secs_f64(),
            capacity = self.history.capacity(),
            "starting sampler"
        );

        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval_at(Instant::now() + cadence, cadence);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let sampler = self.clone();
                        match tokio::task::spawn_blocking(move || sampler.tick()).await {
                            Ok(sample) => debug!(
                                timestamp = sample.timestamp,
                                cpu = ?sample.cpu_percent,
                                mem = ?sample.mem_percent,
                                disk = ?sample.disk_percent,
                                load1 = ?sample.load1,
                                "recorded sample"
                            ),
                            Err(e) => warn!(error = %e, "sampling tick failed"),
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("sampler stopped");
        });

        SamplerHandle { stop_tx, task }
    }
}

/// Handle for controlling the sampling loop.
///
/// Drop this handle to stop sampling, or call `stop()` explicitly.
#[derive(Debug)]
pub struct SamplerHandle {
    stop_tx: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl SamplerHandle {
    /// Stop sampling. A tick already in progress still completes.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }

    /// Stop sampling and wait for the loop to exit.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }

    /// True once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
