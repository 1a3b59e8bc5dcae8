//! Observability: in-process metrics, request instrumentation, and log setup.

pub mod logging;
pub mod metrics;
pub mod middleware;
