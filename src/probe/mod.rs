//! Probe module
//!
//! Everything on the measurement side of the exporter:
//!
//! - `target`: where the probe points (`host` / `host:port` parsing)
//! - `runner`: spawning the iperf3 subprocess and capturing its output
//! - `parser`: pure extraction of the sent/received rates from iperf3 JSON
//! - `errors`: probe, parse, and configuration error types

pub mod errors;
pub mod parser;
pub mod runner;
pub mod target;

pub use errors::{ConfigError, ParseError, ProbeCycleError, ProbeError};
pub use parser::{Throughput, parse_summary};
pub use runner::ProbeRunner;
pub use target::{DEFAULT_PORT, Target};
