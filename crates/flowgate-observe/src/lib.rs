//! Observability setup for Flowgate.

pub mod tracing_setup;
