use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForwarderConfig {
    /// TCP connect plus TLS handshake.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Sending the request and reading the whole response body.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// PEM bundle trusted in addition to the webpki roots.
    #[serde(default)]
    pub extra_ca_file: Option<String>,
}

impl ForwarderConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            response_timeout_ms: default_response_timeout_ms(),
            extra_ca_file: None,
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_response_timeout_ms() -> u64 {
    60_000
}
