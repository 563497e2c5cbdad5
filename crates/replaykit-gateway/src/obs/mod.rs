//! Lightweight in-process metrics.
//!
//! Conversion counters and latencies are stored as atomics and rendered in
//! Prometheus text format by the `/metrics` handler.

pub mod metrics;
