//! Error types for probe execution and output parsing
//!
//! Probe and parse failures are recoverable: the scheduler records them as a
//! zero-valued measurement and waits for the next cycle. Configuration errors
//! are fatal and stop the process at startup.

use thiserror::Error;

/// Startup configuration problems. These abort the process before any probe
/// runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The target string was empty or contained an empty host part
    #[error("target host must not be empty")]
    EmptyHost,

    /// The target carried a `:port` suffix that is not a valid port number
    #[error("target '{input}' has an invalid port: {reason}")]
    InvalidPort { input: String, reason: String },

    /// A numeric option that must be positive was given as zero
    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },
}

/// Failures of a single probe subprocess invocation
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe binary could not be started (missing, not executable, ...)
    #[error("failed to spawn '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The probe ran but reported failure through its exit status
    #[error("'{binary}' exited with status {code:?}: {stderr}")]
    NonZeroExit {
        binary: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The probe did not finish within the allowed wall-clock window
    #[error("probe did not finish within {limit_secs}s")]
    TimedOut { limit_secs: u64 },
}

/// Failures interpreting the output of an otherwise successful probe run
#[derive(Debug, Error)]
pub enum ParseError {
    /// The output was not a well-formed JSON document
    #[error("probe output is not well-formed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The document parsed but the end summary rates were absent or not numeric
    #[error("probe output is missing the throughput summary: {0}")]
    MissingSummary(#[source] serde_json::Error),
}

/// Either way a probe cycle can go wrong. The scheduler treats both sides
/// identically: zero the gauges and wait for the next tick.
#[derive(Debug, Error)]
pub enum ProbeCycleError {
    #[error(transparent)]
    Execution(#[from] ProbeError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
