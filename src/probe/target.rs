//! Probe target parsing
//!
//! A target names the iperf3 server the exporter measures against. It is
//! parsed once at startup from the `--target` option and stays immutable for
//! the process lifetime.

use std::fmt;

use crate::probe::errors::ConfigError;

/// Default iperf3 server port, used when the target string carries no
/// explicit `:port` suffix.
pub const DEFAULT_PORT: u16 = 5201;

/// Where the probe points: an iperf3 server host and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Hostname or IP address of the iperf3 server
    pub host: String,
    /// TCP port the iperf3 server listens on
    pub port: u16,
}

impl Target {
    /// Parses a `host` or `host:port` string.
    ///
    /// `"10.0.0.5:9201"` yields host `10.0.0.5` with port 9201;
    /// `"10.0.0.5"` falls back to the default iperf3 port 5201.
    /// IPv6 literals need brackets to carry a port (`"[2001:db8::1]:9201"`);
    /// a bare literal with multiple colons is taken as a host with the
    /// default port rather than split at the last colon.
    /// An empty host or a non-numeric port is a fatal configuration error.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let input = input.trim();

        if let Some(rest) = input.strip_prefix('[') {
            return Self::parse_bracketed(input, rest);
        }

        // More than one colon can only be an IPv6 literal; splitting one of
        // those at the last colon would turn part of the address into a port.
        if input.matches(':').count() > 1 {
            return Ok(Self {
                host: input.to_string(),
                port: DEFAULT_PORT,
            });
        }

        match input.rsplit_once(':') {
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(ConfigError::EmptyHost);
                }
                let port = Self::parse_port(input, port)?;
                Ok(Self {
                    host: host.to_string(),
                    port,
                })
            }
            None => {
                if input.is_empty() {
                    return Err(ConfigError::EmptyHost);
                }
                Ok(Self {
                    host: input.to_string(),
                    port: DEFAULT_PORT,
                })
            }
        }
    }

    /// Handles the `[host]` and `[host]:port` forms.
    fn parse_bracketed(input: &str, rest: &str) -> Result<Self, ConfigError> {
        let Some((host, after)) = rest.split_once(']') else {
            return Err(ConfigError::InvalidPort {
                input: input.to_string(),
                reason: "missing closing ']'".to_string(),
            });
        };
        if host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        let port = match after {
            "" => DEFAULT_PORT,
            _ => match after.strip_prefix(':') {
                Some(port) => Self::parse_port(input, port)?,
                None => {
                    return Err(ConfigError::InvalidPort {
                        input: input.to_string(),
                        reason: format!("unexpected '{after}' after ']'"),
                    });
                }
            },
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    fn parse_port(input: &str, port: &str) -> Result<u16, ConfigError> {
        port.parse::<u16>().map_err(|e| ConfigError::InvalidPort {
            input: input.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
