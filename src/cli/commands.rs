use std::time::Duration;

use clap::Parser;

use crate::probe::{ConfigError, Target};

/// Command-line options for the exporter
/// Uses clap's derive macros for automatic CLI generation
#[derive(Debug, Parser)]
#[command(version)] // Automatically uses version from Cargo.toml
#[command(about = "Prometheus exporter for iperf3 throughput measurements")]
#[command(long_about = "Periodically runs iperf3 against a target host, extracts the measured \
send/receive throughput, and exposes the latest values as Prometheus gauges on GET /metrics. \
A failed probe zeroes both gauges until the next successful measurement.\n\n\
Examples:\n  \
iperf3-exporter -t 10.0.0.5                  # probe 10.0.0.5:5201 every 10s\n  \
iperf3-exporter -t 10.0.0.5:9201 -i 30       # custom iperf3 port, 30s interval\n  \
iperf3-exporter -t lab-host --time 5 -p 9100 # 5s probes, scrape on :9100")]
pub struct Cli {
    /// HTTP port the /metrics endpoint binds to
    #[arg(short = 'p', long, default_value_t = 5252, help = "Port to bind")]
    pub port: u16,

    /// Seconds between probe cycles
    #[arg(
        short = 'i',
        long,
        default_value_t = 10,
        help = "Metrics collection interval (seconds)"
    )]
    pub interval: u64,

    /// iperf3 server to measure against, as `host` or `host:port`
    /// (port defaults to 5201 when omitted)
    #[arg(short = 't', long, help = "Target host (or host:port) for iperf3")]
    pub target: String,

    /// Seconds each probe transmits for, forwarded to `iperf3 -t`
    #[arg(long, default_value_t = 1, help = "Probe duration (seconds)")]
    pub time: u64,

    /// iperf3 binary to invoke (name on PATH or an absolute path)
    #[arg(long, default_value = "iperf3", help = "iperf3 binary to invoke")]
    pub iperf3_path: String,
}

/// Validated runtime configuration, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Port the HTTP listener binds to
    pub listen_port: u16,
    /// Period of the probe scheduler
    pub interval: Duration,
    /// Parsed probe target (host plus effective iperf3 port)
    pub target: Target,
    /// Duration of each probe run in seconds
    pub probe_duration_secs: u64,
    /// Probe binary to invoke
    pub iperf3_path: String,
}

impl Cli {
    /// Validates the raw options into an [`ExporterConfig`].
    ///
    /// A missing or malformed target and zero-valued timing options are
    /// fatal; the process must not start with them.
    pub fn into_config(self) -> Result<ExporterConfig, ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ZeroValue { field: "port" });
        }
        if self.interval == 0 {
            return Err(ConfigError::ZeroValue { field: "interval" });
        }
        if self.time == 0 {
            return Err(ConfigError::ZeroValue { field: "time" });
        }

        let target = Target::parse(&self.target)?;

        Ok(ExporterConfig {
            listen_port: self.port,
            interval: Duration::from_secs(self.interval),
            target,
            probe_duration_secs: self.time,
            iperf3_path: self.iperf3_path,
        })
    }
}
