//! Probe scheduler
//!
//! Drives the recurring measurement loop: every tick runs one probe, parses
//! its output, and applies the result to the gauges. The loop is strictly
//! sequential, so at most one probe subprocess is ever in flight; ticks that
//! fire while a probe is still running are skipped rather than overlapped.
//!
//! Nothing a probe cycle does can escape this loop as an error. Execution
//! and parse failures alike end as zeroed gauges plus a log line, and the
//! next tick starts from a clean slate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{info, warn};
use tokio::time::MissedTickBehavior;

use crate::metrics::MetricsState;
use crate::probe::{ProbeCycleError, ProbeRunner, Throughput, parse_summary};

/// Outcome of one completed probe cycle, mainly for logging and tests.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// UTC time the cycle started
    pub timestamp: DateTime<Utc>,
    /// Target label the gauges were updated under
    pub target: String,
    /// Wall-clock seconds the cycle took, including tool startup overhead
    pub elapsed_secs: f64,
    /// Send rate applied to the gauge (zero on failure)
    pub sent_bps: f64,
    /// Receive rate applied to the gauge (zero on failure)
    pub received_bps: f64,
    /// Whether the probe ran and parsed cleanly
    pub succeeded: bool,
}

/// Recurring probe loop with a fixed period.
pub struct Scheduler {
    runner: ProbeRunner,
    metrics: Arc<MetricsState>,
    period: Duration,
}

impl Scheduler {
    pub fn new(runner: ProbeRunner, metrics: Arc<MetricsState>, period: Duration) -> Self {
        Self {
            runner,
            metrics,
            period,
        }
    }

    /// Runs probe cycles forever at the configured period.
    ///
    /// A probe that outlasts the period causes the missed ticks to be
    /// coalesced into the next one instead of spawning a concurrent probe.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The interval's first tick completes immediately; consume it so the
        // first probe lands one full period after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }

    /// Executes a single probe cycle and applies its outcome to the gauges.
    ///
    /// Infallible by construction: every failure path is absorbed into a
    /// zero-valued measurement.
    pub async fn run_once(&self) -> ProbeReport {
        let timestamp = Utc::now();
        let started = Instant::now();
        let target = self.runner.target().host.clone();

        let outcome = self.measure().await;
        let elapsed_secs = started.elapsed().as_secs_f64();

        match outcome {
            Ok(throughput) => {
                self.metrics
                    .record_success(&target, throughput.sent_bps, throughput.received_bps);
                info!(
                    "measured {target}: sent {:.0} bit/s, received {:.0} bit/s ({elapsed_secs:.2}s)",
                    throughput.sent_bps, throughput.received_bps
                );
                ProbeReport {
                    timestamp,
                    target,
                    elapsed_secs,
                    sent_bps: throughput.sent_bps,
                    received_bps: throughput.received_bps,
                    succeeded: true,
                }
            }
            Err(err) => {
                self.metrics.record_failure(&target);
                warn!("probe against {target} failed, gauges zeroed: {err}");
                ProbeReport {
                    timestamp,
                    target,
                    elapsed_secs,
                    sent_bps: 0.0,
                    received_bps: 0.0,
                    succeeded: false,
                }
            }
        }
    }

    async fn measure(&self) -> Result<Throughput, ProbeCycleError> {
        let raw = self.runner.run().await?;
        Ok(parse_summary(&raw)?)
    }
}
