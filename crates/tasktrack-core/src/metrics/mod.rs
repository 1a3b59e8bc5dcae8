//! In-process metrics instruments rendered in Prometheus text format.
//!
//! Instruments (`Counter`, `Gauge`, `Histogram`) are cheap `Clone` handles over
//! shared state. Each label tuple owns its own atomic accumulator inside a
//! `DashMap`, so concurrent updates to different tuples do not contend and
//! first-use creation of a tuple goes through the map's entry API.
//!
//! A `Registry` owns the set of instruments a process exposes, keeps them in
//! registration order, and renders them on demand.

mod atomic;
mod counter;
mod desc;
mod gauge;
mod histogram;
mod process;
mod registry;
mod text;

use thiserror::Error;

pub use counter::Counter;
pub use desc::Desc;
pub use gauge::Gauge;
pub use histogram::{validate_bounds, Histogram, HistogramSnapshot, DEFAULT_BUCKETS};
pub use process::ProcessMetrics;
pub use registry::{Collector, Instrument, Registry};

/// Content type of the Prometheus text exposition format (v0.0.4).
pub const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Errors raised by instrument construction, registration and observation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("metric already registered: {0}")]
    DuplicateName(String),
    #[error("negative delta {delta} for counter {name}")]
    NegativeDelta { name: String, delta: f64 },
    #[error("metric {name} expects {expected} label values, got {got}")]
    LabelArity {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid metric or label name: {0}")]
    InvalidName(String),
    #[error("invalid histogram buckets for {name}: {reason}")]
    InvalidBuckets { name: String, reason: String },
    #[error("non-finite value {value} for {name}")]
    InvalidValue { name: String, value: f64 },
}
