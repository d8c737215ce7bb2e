//! Probe subprocess execution
//!
//! One `ProbeRunner::run` call spawns exactly one iperf3 client process,
//! captures its output, and classifies the result. There is no retry here;
//! a failed run is reported to the scheduler, which tries again on the next
//! tick.

use std::process::Stdio;
use std::time::Duration;

use log::{debug, trace};
use tokio::process::Command;
use tokio::time::timeout;

use crate::probe::errors::ProbeError;
use crate::probe::target::Target;

/// Wall-clock allowance beyond the configured probe duration before the
/// subprocess is considered hung and its wait is abandoned.
const PROBE_GRACE_SECS: u64 = 10;

/// Invokes the external bandwidth-measurement tool against a fixed target.
///
/// Equivalent command line: `iperf3 -i 0 -t <duration> -c <host> -p <port>
/// --json`. Interval reporting is disabled so the tool emits only the final
/// summary document.
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    binary: String,
    target: Target,
    duration_secs: u64,
}

impl ProbeRunner {
    /// Creates a runner for `iperf3` found on `PATH`.
    pub fn new(target: Target, duration_secs: u64) -> Self {
        Self {
            binary: "iperf3".to_string(),
            target,
            duration_secs,
        }
    }

    /// Overrides the probe binary, e.g. an absolute path or a test stand-in.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// The target this runner probes.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Runs one probe to completion and returns the raw standard output for
    /// the parser.
    ///
    /// Any non-zero exit status, spawn failure, or a run exceeding the
    /// duration plus a fixed grace period is an error. The child is killed
    /// when the wait is abandoned.
    pub async fn run(&self) -> Result<String, ProbeError> {
        let limit = Duration::from_secs(self.duration_secs + PROBE_GRACE_SECS);

        let mut command = Command::new(&self.binary);
        command
            .arg("-i")
            .arg("0")
            .arg("-t")
            .arg(self.duration_secs.to_string())
            .arg("-c")
            .arg(&self.target.host)
            .arg("-p")
            .arg(self.target.port.to_string())
            .arg("--json")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(
            "probing {} for {}s with '{}'",
            self.target, self.duration_secs, self.binary
        );

        let output = match timeout(limit, command.output()).await {
            Ok(result) => result.map_err(|source| ProbeError::Spawn {
                binary: self.binary.clone(),
                source,
            })?,
            Err(_) => {
                return Err(ProbeError::TimedOut {
                    limit_secs: limit.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ProbeError::NonZeroExit {
                binary: self.binary.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!("probe produced {} bytes of output", stdout.len());
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> ProbeRunner {
        let target = Target::parse("203.0.113.5").expect("valid target");
        ProbeRunner::new(target, 1)
    }

    #[test]
    fn default_binary_is_iperf3_on_path() {
        assert_eq!(runner().binary, "iperf3");
    }

    #[test]
    fn binary_override_is_applied() {
        let runner = runner().with_binary("/opt/tools/iperf3");
        assert_eq!(runner.binary, "/opt/tools/iperf3");
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let runner = runner().with_binary("/nonexistent/iperf3-test-binary");
        let err = runner.run().await.expect_err("binary does not exist");
        assert!(matches!(err, ProbeError::Spawn { .. }));
    }

    #[tokio::test]
    async fn non_zero_exit_carries_stderr() {
        // `false` exits 1 with no output on every platform we test on.
        let runner = runner().with_binary("false");
        let err = runner.run().await.expect_err("tool reported failure");
        match err {
            ProbeError::NonZeroExit { code, .. } => assert_eq!(code, Some(1)),
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }
}
