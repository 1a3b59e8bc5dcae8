//! Top-level facade crate for tasktrack.
//!
//! Re-exports the metrics core and the HTTP server library so users can depend on a single crate.

pub mod core {
    pub use tasktrack_core::*;
}

pub mod server {
    pub use tasktrack_server::*;
}
