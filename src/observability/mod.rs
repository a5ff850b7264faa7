//! Observability subsystem: structured logs via `tracing` (initialized
//! in `main`) and Prometheus metrics.

pub mod metrics;
