//! iperf3-exporter
//!
//! A network-throughput exporter: it periodically runs iperf3 in client mode
//! against a configured target, parses the JSON summary into send/receive
//! bits-per-second, and serves the latest values as Prometheus gauges over
//! `GET /metrics`.
//!
//! Control flow per cycle: scheduler tick → probe subprocess → summary
//! parser → gauge update. Failures at any step zero the gauges for that
//! target until a later cycle succeeds.

pub mod cli;
pub mod metrics;
pub mod probe;
pub mod scheduler;
pub mod server;

pub use cli::{Cli, ExporterConfig};
pub use metrics::MetricsState;
pub use probe::{ProbeRunner, Target};
pub use scheduler::{ProbeReport, Scheduler};
