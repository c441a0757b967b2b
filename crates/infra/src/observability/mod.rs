//! Observability infrastructure
//!
//! Library code only emits `tracing` events with structured fields; this
//! module owns the one place where a subscriber is installed.

pub mod logging;

pub use logging::{build_filter, init_logging};
