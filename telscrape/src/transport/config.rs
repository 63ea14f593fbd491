//! Telnet connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Telnet TCP port.
pub const DEFAULT_PORT: u16 = 23;

/// Telnet connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// Telnet port (default: 23).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connection timeout.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Deadline for one read-to-prompt. `None` waits indefinitely.
    #[serde(default)]
    pub read_timeout: Option<Duration>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

impl TransportConfig {
    /// Configuration for `host` on the standard port.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: default_connect_timeout(),
            read_timeout: None,
        }
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransportConfig::new("switch1");
        assert_eq!(config.port, 23);
        assert_eq!(config.read_timeout, None);
        assert_eq!(config.socket_addr(), "switch1:23");
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: TransportConfig = serde_json::from_str(r#"{"host": "10.0.0.1"}"#).unwrap();
        assert_eq!(config, TransportConfig::new("10.0.0.1"));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut config = TransportConfig::new("router1");
        config.port = 2323;
        config.read_timeout = Some(Duration::from_millis(1500));

        let json = serde_json::to_string(&config).unwrap();
        let back: TransportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
