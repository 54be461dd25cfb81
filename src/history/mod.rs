//! Sample history: the bounded buffer and the loop that fills it.
//!
//! ```text
//! MetricSource ──tick every cadence──▶ Sampler ──record()──▶ History
//!                                                              │
//!                      GET /api/history?period=N ◀──query()────┘
//! ```

pub mod buffer;
pub mod sampler;

pub use buffer::{History, DEFAULT_CADENCE, DEFAULT_CAPACITY, DEFAULT_PERIOD_SECS};
pub use sampler::{collect_sample, Sampler, SamplerHandle};
