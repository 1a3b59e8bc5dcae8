//! tasktrack server library entry.
//!
//! Wires config, the task store, the metrics bridge, and the HTTP router into
//! one service. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;
pub mod tasks;
