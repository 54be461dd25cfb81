//! # hostwatch-types
//!
//! Core types for hostwatch. This crate defines the records the sampler
//! stores, the parallel-array shape the history API returns, and the
//! instantaneous readings shown on the status page.
//!
//! ## Features
//!
//! - `serde`: JSON serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use hostwatch_types::{HistorySeries, Sample};
//!
//! let samples = vec![
//!     Sample::builder().timestamp(30).cpu_percent(20.0).build(),
//!     Sample::builder().timestamp(60).cpu_percent(30.0).mem_percent(41.5).build(),
//! ];
//!
//! let series: HistorySeries = samples.iter().collect();
//! assert_eq!(series.labels, vec![30, 60]);
//! assert_eq!(series.cpu, vec![Some(20.0), Some(30.0)]);
//! assert_eq!(series.mem, vec![None, Some(41.5)]);
//! ```

mod readings;
mod sample;
mod series;

pub use readings::*;
pub use sample::*;
pub use series::*;
