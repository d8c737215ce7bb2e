//! iperf3 JSON output parsing
//!
//! iperf3 run with `--json` emits one document per invocation; the fields the
//! exporter cares about live under `end.sum_sent.bits_per_second` and
//! `end.sum_received.bits_per_second`. Parsing is pure: no I/O, no state.

use serde::Deserialize;

use crate::probe::errors::ParseError;

/// Throughput measured by one probe run, in bits per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub sent_bps: f64,
    pub received_bps: f64,
}

#[derive(Debug, Deserialize)]
struct IperfRun {
    end: EndSection,
}

#[derive(Debug, Deserialize)]
struct EndSection {
    sum_sent: StreamSummary,
    sum_received: StreamSummary,
}

#[derive(Debug, Deserialize)]
struct StreamSummary {
    bits_per_second: f64,
}

/// Extracts the end-of-run throughput summary from raw iperf3 JSON output.
///
/// Fails when the input is not well-formed JSON, or when the summary fields
/// are absent or not numeric. Extra fields in the document are ignored.
pub fn parse_summary(raw: &str) -> Result<Throughput, ParseError> {
    let document: serde_json::Value = serde_json::from_str(raw).map_err(ParseError::Malformed)?;
    let run: IperfRun = serde_json::from_value(document).map_err(ParseError::MissingSummary)?;

    Ok(Throughput {
        sent_bps: run.end.sum_sent.bits_per_second,
        received_bps: run.end.sum_received.bits_per_second,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_both_rates_from_a_minimal_document() {
        let raw = r#"{"end":{"sum_sent":{"bits_per_second":123456.0},"sum_received":{"bits_per_second":654321.0}}}"#;
        let throughput = parse_summary(raw).expect("valid summary");
        assert_eq!(throughput.sent_bps, 123456.0);
        assert_eq!(throughput.received_bps, 654321.0);
    }

    #[test]
    fn ignores_unrelated_fields_in_a_realistic_document() {
        // Trimmed-down shape of real iperf3 output: start/intervals sections
        // and extra summary fields alongside the rates we need.
        let raw = r#"{
            "start": {"connected": [{"socket": 5}], "version": "iperf 3.12"},
            "intervals": [],
            "end": {
                "sum_sent": {
                    "start": 0,
                    "end": 1.000087,
                    "bytes": 117440512,
                    "bits_per_second": 939442518.3,
                    "retransmits": 0
                },
                "sum_received": {
                    "start": 0,
                    "end": 1.000087,
                    "bytes": 116391936,
                    "bits_per_second": 931054387.9
                },
                "cpu_utilization_percent": {"host_total": 2.5}
            }
        }"#;
        let throughput = parse_summary(raw).expect("valid summary");
        assert_eq!(throughput.sent_bps, 939442518.3);
        assert_eq!(throughput.received_bps, 931054387.9);
    }

    #[test]
    fn integer_rates_parse_as_floats() {
        let raw = r#"{"end":{"sum_sent":{"bits_per_second":1000000},"sum_received":{"bits_per_second":2000000}}}"#;
        let throughput = parse_summary(raw).expect("valid summary");
        assert_eq!(throughput.sent_bps, 1_000_000.0);
        assert_eq!(throughput.received_bps, 2_000_000.0);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_summary("iperf3: error - unable to connect").expect_err("not JSON");
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_summary(""), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn missing_end_section_is_rejected() {
        let err = parse_summary(r#"{"intervals":[]}"#).expect_err("no summary");
        assert!(matches!(err, ParseError::MissingSummary(_)));
    }

    #[test]
    fn missing_received_summary_is_rejected() {
        let raw = r#"{"end":{"sum_sent":{"bits_per_second":123456.0}}}"#;
        let err = parse_summary(raw).expect_err("no received summary");
        assert!(matches!(err, ParseError::MissingSummary(_)));
    }

    #[test]
    fn non_numeric_rate_is_rejected() {
        let raw = r#"{"end":{"sum_sent":{"bits_per_second":"fast"},"sum_received":{"bits_per_second":1.0}}}"#;
        let err = parse_summary(raw).expect_err("non-numeric rate");
        assert!(matches!(err, ParseError::MissingSummary(_)));
    }
}
