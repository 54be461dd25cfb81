//! # hostwatch
//!
//! A single-host resource monitor: reads CPU, memory, disk, load and uptime
//! from kernel counters, keeps a bounded history of periodic samples and
//! serves both over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          hostwatch                            │
//! │  ┌──────────┐  tick   ┌──────────┐ record  ┌──────────┐       │
//! │  │ readers  │────────▶│ sampler  │────────▶│ history  │       │
//! │  │ (Procfs) │         └──────────┘         └────┬─────┘       │
//! │  └────┬─────┘                                   │ query       │
//! │       │ overview                                ▼             │
//! │       │                 ┌──────────┐    GET /api/history      │
//! │       └────────────────▶│  server  │◀── GET /                 │
//! │                         └──────────┘                          │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`readers`]**: one reader per metric over `/proc` and `statvfs(3)`,
//!   behind the [`MetricSource`] trait. Readers never fail, a metric that
//!   cannot be read is `None`.
//! - **[`history`]**: the bounded FIFO [`History`] and the [`Sampler`] loop
//!   that fills it on a fixed cadence
//! - **[`page`]**: the HTML status page
//! - **[`server`]**: the hyper HTTP server routing `/`, `/index.html` and
//!   `/api/history`
//! - **[`config`]**: layered [`Settings`]
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Serve on the default 0.0.0.0:61208
//! hostwatch
//!
//! # Settings file plus a flag override
//! hostwatch --config hostwatch.toml --bind 127.0.0.1:8080
//!
//! # Print the current readings as JSON and exit
//! hostwatch --once
//! ```
//!
//! ### As a library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hostwatch::{History, Procfs, Sampler};
//!
//! # tokio_test::block_on(async {
//! let history = Arc::new(History::default());
//! let _sampler = Sampler::new(history.clone(), Arc::new(Procfs::new())).start();
//!
//! // Later: the last hour of samples as parallel arrays.
//! let series = history.query(3600);
//! println!("{} samples", series.len());
//! # });
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod page;
pub mod readers;
pub mod server;

pub use config::Settings;
pub use error::ReadError;
pub use history::{History, Sampler, SamplerHandle};
pub use page::{render_status_page, PageOptions};
pub use readers::{
    read_cpu_delta, read_cpu_instant, read_disk, read_hostname, read_load, read_mem, read_uptime,
    MetricSource, Procfs,
};
pub use server::{ServerContext, StatusServer};

pub use hostwatch_types::{DiskUsage, HistorySeries, LoadAverage, MemoryUsage, Overview, Sample};
