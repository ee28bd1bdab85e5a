use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Client session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hostname or address of the CasparCG server, defaults to `localhost`.
    pub host: String,

    /// Port of the AMCP listener, defaults to [`DEFAULT_PORT`](crate::DEFAULT_PORT).
    pub port: u16,

    /// Bound on establishing the TCP connection.
    pub connect_timeout: Duration,

    /// Bound on reading a full reply, when the query doesn't specify one.
    /// Set to `None` to wait forever.
    pub read_timeout: Option<Duration>,

    /// Whether outgoing commands are logged at the `debug` level, `INFO` polling excepted.
    pub verbose: bool,
}

impl Config {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    /// A default configuration targeting `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: crate::DEFAULT_PORT,
            connect_timeout: Self::DEFAULT_TIMEOUT,
            read_timeout: Some(Self::DEFAULT_TIMEOUT),
            verbose: true,
        }
    }
}
