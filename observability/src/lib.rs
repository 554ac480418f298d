//! Logging setup for the glue utilities.
//!
//! Libraries only emit `tracing` events; binaries call [`init_tracing`] once
//! at startup to decide where they go.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, TracingConfig};

/// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, trace, warn, span, Level};
