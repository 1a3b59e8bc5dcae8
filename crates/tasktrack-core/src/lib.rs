//! tasktrack core: in-process metrics instruments, the registry that renders
//! them in Prometheus text format, and the shared error surface.
//!
//! This crate carries no HTTP or runtime dependencies so the instruments can be
//! exercised directly from tests and from any server wiring.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `MetricsError` or `TaskTrackError` so a bad observation never
//! takes the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{Result, TaskTrackError};
