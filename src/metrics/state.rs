//! Metrics state
//!
//! Two labeled gauges hold the last-known throughput measurement. The
//! scheduler is the only writer; the HTTP endpoint renders snapshots
//! concurrently. Both gauges are updated as one logical step so a scrape can
//! never observe a half-applied probe cycle.

use std::sync::{Mutex, PoisonError};

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder, TEXT_FORMAT};

/// Current throughput gauges, keyed by the probe target label.
///
/// Values follow last-write-wins semantics: a successful probe cycle sets
/// both gauges to the measured rates, a failed one sets both to zero. Zero
/// is the explicit "currently unreachable" signal, not "never measured".
pub struct MetricsState {
    registry: Registry,
    sent: GaugeVec,
    received: GaugeVec,
    // Paired updates and renders serialize on this lock so no scrape sees
    // one gauge from the current cycle and the other from the previous one.
    snapshot_lock: Mutex<()>,
}

impl MetricsState {
    /// Builds an owned registry with the two throughput gauges registered.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let sent = GaugeVec::new(
            Opts::new(
                "sent_bits_per_second",
                "Send throughput to the target measured by the last probe",
            ),
            &["target"],
        )?;
        let received = GaugeVec::new(
            Opts::new(
                "received_bits_per_second",
                "Receive throughput from the target measured by the last probe",
            ),
            &["target"],
        )?;

        registry.register(Box::new(sent.clone()))?;
        registry.register(Box::new(received.clone()))?;

        Ok(Self {
            registry,
            sent,
            received,
            snapshot_lock: Mutex::new(()),
        })
    }

    /// Records a successful measurement for `target`.
    pub fn record_success(&self, target: &str, sent_bps: f64, received_bps: f64) {
        self.set_pair(target, sent_bps, received_bps);
    }

    /// Records a failed probe cycle for `target` by zeroing both gauges.
    pub fn record_failure(&self, target: &str) {
        self.set_pair(target, 0.0, 0.0);
    }

    fn set_pair(&self, target: &str, sent_bps: f64, received_bps: f64) {
        let _guard = self
            .snapshot_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.sent.with_label_values(&[target]).set(sent_bps);
        self.received.with_label_values(&[target]).set(received_bps);
    }

    /// Renders the current gauge values in the Prometheus text exposition
    /// format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let _guard = self
            .snapshot_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// MIME type of the exposition format produced by [`render`](Self::render).
    pub fn exposition_content_type(&self) -> &'static str {
        TEXT_FORMAT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_renders_no_samples() {
        let state = MetricsState::new().expect("registry setup");
        let body = state.render().expect("render");
        assert!(!body.contains("sent_bits_per_second{"));
        assert!(!body.contains("received_bits_per_second{"));
    }

    #[test]
    fn success_sets_both_gauges_for_the_target_label() {
        let state = MetricsState::new().expect("registry setup");
        state.record_success("203.0.113.5", 123456.0, 654321.0);

        let body = state.render().expect("render");
        assert!(body.contains("sent_bits_per_second{target=\"203.0.113.5\"} 123456"));
        assert!(body.contains("received_bits_per_second{target=\"203.0.113.5\"} 654321"));
    }

    #[test]
    fn failure_zeroes_both_gauges_regardless_of_prior_values() {
        let state = MetricsState::new().expect("registry setup");
        state.record_success("203.0.113.5", 123456.0, 654321.0);
        state.record_failure("203.0.113.5");

        let body = state.render().expect("render");
        assert!(body.contains("sent_bits_per_second{target=\"203.0.113.5\"} 0"));
        assert!(body.contains("received_bits_per_second{target=\"203.0.113.5\"} 0"));
    }

    #[test]
    fn updates_follow_last_write_wins() {
        let state = MetricsState::new().expect("registry setup");
        state.record_failure("203.0.113.5");
        state.record_success("203.0.113.5", 42.5, 17.25);

        let body = state.render().expect("render");
        assert!(body.contains("sent_bits_per_second{target=\"203.0.113.5\"} 42.5"));
        assert!(body.contains("received_bits_per_second{target=\"203.0.113.5\"} 17.25"));
    }

    #[test]
    fn content_type_is_the_prometheus_text_format() {
        let state = MetricsState::new().expect("registry setup");
        assert!(state.exposition_content_type().starts_with("text/plain"));
    }
}
