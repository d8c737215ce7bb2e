//! Metrics module
//!
//! Owns the Prometheus registry and the two throughput gauges. Constructed
//! once at startup and shared (via `Arc`) between the scheduler, which
//! writes, and the HTTP endpoint, which only reads.

pub mod state;

pub use state::MetricsState;
